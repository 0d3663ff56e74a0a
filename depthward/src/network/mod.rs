//! Network Layer
//!
//! Presence only: other players' positions, orientations and chat. Nothing
//! here affects the local simulation beyond what is drawn.

pub mod protocol;
pub mod presence;
pub mod transport;

pub use protocol::{
    ClientMessage, ServerMessage, PlayerStatePayload, RemotePlayerInfo,
    ChatError, validate_chat, escape_html,
};
pub use presence::{PresenceSync, PresenceEvent, RemoteActor, ChatLine, VisualHandle};
pub use transport::{Transport, TransportError, ChannelTransport, TransportPeer, OfflineTransport};
