//! Input Capture and Normalization
//!
//! Maps raw host input (keyboard key codes, touch regions) onto a flat set of
//! named boolean intents. The resulting `InputState` is replaced wholesale
//! every frame; nothing is queued between frames.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

// =============================================================================
// INTENTS
// =============================================================================

/// A named player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Intent {
    /// Move along the facing direction
    Forward = 0,
    /// Move against the facing direction (reduced speed)
    Backward = 1,
    /// Turn left
    Left = 2,
    /// Turn right
    Right = 3,
    /// Jump when grounded
    Jump = 4,
    /// Talk to NPCs / advance dialogue
    Interact = 5,
    /// Context action
    Action = 6,
    /// Toggle the pause screen
    Pause = 7,
}

impl Intent {
    /// All intents, in bit order.
    pub const ALL: [Intent; 8] = [
        Intent::Forward,
        Intent::Backward,
        Intent::Left,
        Intent::Right,
        Intent::Jump,
        Intent::Interact,
        Intent::Action,
        Intent::Pause,
    ];

    /// Bit flag for this intent.
    #[inline]
    pub const fn flag(self) -> u8 {
        1 << (self as u8)
    }
}

// =============================================================================
// INPUT STATE
// =============================================================================

/// Intents active during a single frame.
///
/// Packed into one byte, one bit per `Intent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputState {
    /// Packed intent bits
    pub flags: u8,
}

impl InputState {
    /// No intents active.
    pub const IDLE: Self = Self { flags: 0 };

    /// Create an empty input state.
    pub const fn new() -> Self {
        Self::IDLE
    }

    /// Create an input state with the given intents set.
    pub fn with(intents: &[Intent]) -> Self {
        let mut state = Self::new();
        for intent in intents {
            state.set(*intent, true);
        }
        state
    }

    /// Check if an intent is active.
    #[inline]
    pub fn is_set(&self, intent: Intent) -> bool {
        self.flags & intent.flag() != 0
    }

    /// Set or clear an intent.
    #[inline]
    pub fn set(&mut self, intent: Intent, active: bool) {
        if active {
            self.flags |= intent.flag();
        } else {
            self.flags &= !intent.flag();
        }
    }

    /// Check if an intent became active this frame (rising edge).
    #[inline]
    pub fn pressed_since(&self, previous: &InputState, intent: Intent) -> bool {
        self.is_set(intent) && !previous.is_set(intent)
    }

    /// Check if no intent is active.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Forward intent.
    #[inline]
    pub fn forward(&self) -> bool {
        self.is_set(Intent::Forward)
    }

    /// Backward intent.
    #[inline]
    pub fn backward(&self) -> bool {
        self.is_set(Intent::Backward)
    }

    /// Turn-left intent.
    #[inline]
    pub fn left(&self) -> bool {
        self.is_set(Intent::Left)
    }

    /// Turn-right intent.
    #[inline]
    pub fn right(&self) -> bool {
        self.is_set(Intent::Right)
    }

    /// Jump intent.
    #[inline]
    pub fn jump(&self) -> bool {
        self.is_set(Intent::Jump)
    }

    /// Interact intent.
    #[inline]
    pub fn interact(&self) -> bool {
        self.is_set(Intent::Interact)
    }

    /// Action intent.
    #[inline]
    pub fn action(&self) -> bool {
        self.is_set(Intent::Action)
    }

    /// Pause intent.
    #[inline]
    pub fn pause(&self) -> bool {
        self.is_set(Intent::Pause)
    }
}

// =============================================================================
// RAW INPUT MAPPING
// =============================================================================

/// On-screen touch control regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchRegion {
    /// D-pad up
    PadUp,
    /// D-pad down
    PadDown,
    /// D-pad left
    PadLeft,
    /// D-pad right
    PadRight,
    /// Jump button
    JumpButton,
    /// Interact button
    InteractButton,
    /// Action button
    ActionButton,
    /// Pause button
    PauseButton,
}

impl TouchRegion {
    /// Intent driven by this region.
    pub fn intent(self) -> Intent {
        match self {
            TouchRegion::PadUp => Intent::Forward,
            TouchRegion::PadDown => Intent::Backward,
            TouchRegion::PadLeft => Intent::Left,
            TouchRegion::PadRight => Intent::Right,
            TouchRegion::JumpButton => Intent::Jump,
            TouchRegion::InteractButton => Intent::Interact,
            TouchRegion::ActionButton => Intent::Action,
            TouchRegion::PauseButton => Intent::Pause,
        }
    }
}

/// Keyboard bindings from DOM key codes to intents.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Key code -> intent
    pub keys: BTreeMap<String, Intent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("KeyW", Intent::Forward),
            ("ArrowUp", Intent::Forward),
            ("KeyS", Intent::Backward),
            ("ArrowDown", Intent::Backward),
            ("KeyA", Intent::Left),
            ("ArrowLeft", Intent::Left),
            ("KeyD", Intent::Right),
            ("ArrowRight", Intent::Right),
            ("Space", Intent::Jump),
            ("KeyE", Intent::Interact),
            ("KeyF", Intent::Action),
            ("Escape", Intent::Pause),
            ("KeyP", Intent::Pause),
        ];

        Self {
            keys: pairs
                .into_iter()
                .map(|(code, intent)| (code.to_string(), intent))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Look up the intent bound to a key code.
    pub fn intent_for(&self, code: &str) -> Option<Intent> {
        self.keys.get(code).copied()
    }
}

/// Tracks held keys and touches and produces one `InputState` per frame.
#[derive(Clone, Debug, Default)]
pub struct InputSource {
    bindings: KeyBindings,
    held_keys: BTreeSet<String>,
    held_touches: BTreeSet<TouchRegion>,
}

impl InputSource {
    /// Create an input source with the given bindings.
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held_keys: BTreeSet::new(),
            held_touches: BTreeSet::new(),
        }
    }

    /// Record a key press. Unbound keys are ignored.
    pub fn key_down(&mut self, code: &str) {
        if self.bindings.intent_for(code).is_some() {
            self.held_keys.insert(code.to_string());
        }
    }

    /// Record a key release.
    pub fn key_up(&mut self, code: &str) {
        self.held_keys.remove(code);
    }

    /// Record a touch starting on a region.
    pub fn touch_start(&mut self, region: TouchRegion) {
        self.held_touches.insert(region);
    }

    /// Record a touch leaving a region.
    pub fn touch_end(&mut self, region: TouchRegion) {
        self.held_touches.remove(&region);
    }

    /// Release everything (window blur, focus loss).
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.held_touches.clear();
    }

    /// Snapshot the current intents.
    pub fn snapshot(&self) -> InputState {
        let mut state = InputState::new();
        for code in &self.held_keys {
            if let Some(intent) = self.bindings.intent_for(code) {
                state.set(intent, true);
            }
        }
        for region in &self.held_touches {
            state.set(region.intent(), true);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_flags_are_distinct() {
        let mut seen = 0u8;
        for intent in Intent::ALL {
            assert_eq!(seen & intent.flag(), 0);
            seen |= intent.flag();
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn test_set_and_clear() {
        let mut state = InputState::new();
        assert!(state.is_idle());

        state.set(Intent::Jump, true);
        assert!(state.jump());
        assert!(!state.forward());

        state.set(Intent::Jump, false);
        assert!(state.is_idle());
    }

    #[test]
    fn test_pressed_since_is_rising_edge() {
        let previous = InputState::with(&[Intent::Pause]);
        let current = InputState::with(&[Intent::Pause, Intent::Interact]);

        assert!(!current.pressed_since(&previous, Intent::Pause));
        assert!(current.pressed_since(&previous, Intent::Interact));
        assert!(!previous.pressed_since(&current, Intent::Interact));
    }

    #[test]
    fn test_keyboard_mapping() {
        let mut source = InputSource::new(KeyBindings::default());
        source.key_down("KeyW");
        source.key_down("Space");
        source.key_down("KeyZ"); // unbound

        let state = source.snapshot();
        assert!(state.forward());
        assert!(state.jump());
        assert!(!state.backward());

        source.key_up("KeyW");
        assert!(!source.snapshot().forward());
    }

    #[test]
    fn test_two_keys_same_intent() {
        let mut source = InputSource::default();
        source.key_down("KeyW");
        source.key_down("ArrowUp");
        source.key_up("KeyW");

        // ArrowUp still held
        assert!(source.snapshot().forward());
    }

    #[test]
    fn test_touch_regions() {
        let mut source = InputSource::default();
        source.touch_start(TouchRegion::PadLeft);
        source.touch_start(TouchRegion::PauseButton);

        let state = source.snapshot();
        assert!(state.left());
        assert!(state.pause());

        source.clear();
        assert!(source.snapshot().is_idle());
    }
}
