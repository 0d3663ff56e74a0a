//! Scoring
//!
//! One scoring function for every way a life can end. The time component
//! decays linearly and floors at zero; collectibles and the win bonus are
//! added on top, and the total is floored to an integer.

use serde::{Serialize, Deserialize};

/// Scoring constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Time score at zero elapsed seconds
    pub base_time_score: f64,
    /// Time score lost per elapsed second
    pub penalty_per_second: f64,
    /// Points per artifact
    pub points_per_artifact: u64,
    /// Points per memory
    pub points_per_memory: u64,
    /// Bonus for reaching the depth goal
    pub win_bonus: u64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            base_time_score: 10_000.0,
            penalty_per_second: 10.0,
            points_per_artifact: 1000,
            points_per_memory: 750,
            win_bonus: 1000,
        }
    }
}

impl ScoreConfig {
    /// Score a life.
    ///
    /// Negative or non-finite elapsed time counts as zero.
    pub fn compute(&self, elapsed_secs: f64, artifacts: u32, memories: u32, is_win: bool) -> u64 {
        let elapsed = if elapsed_secs.is_finite() { elapsed_secs.max(0.0) } else { 0.0 };
        let time_score = (self.base_time_score - elapsed * self.penalty_per_second).max(0.0);

        let collectible_score = u64::from(artifacts)
            .saturating_mul(self.points_per_artifact)
            .saturating_add(u64::from(memories).saturating_mul(self.points_per_memory));
        let bonus = if is_win { self.win_bonus } else { 0 };

        // `as` saturates for floats; time_score is already >= 0
        (time_score.floor() as u64)
            .saturating_add(collectible_score)
            .saturating_add(bonus)
    }
}

/// Score a life with the default constants.
pub fn compute_score(elapsed_secs: f64, artifacts: u32, memories: u32, is_win: bool) -> u64 {
    ScoreConfig::default().compute(elapsed_secs, artifacts, memories, is_win)
}
