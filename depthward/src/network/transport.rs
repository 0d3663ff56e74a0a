//! Presence Transport
//!
//! The game loop talks to the presence server through `Transport`. The
//! socket itself lives elsewhere; `ChannelTransport` hands JSON text frames
//! to and from a socket task over tokio channels, so the loop never awaits.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::network::protocol::{ClientMessage, ServerMessage};

/// Frames buffered in each direction.
pub const CHANNEL_CAPACITY: usize = 64;

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// `send` before `connect`, or after a disconnect.
    #[error("Not connected")]
    NotConnected,

    /// The socket task went away.
    #[error("Channel closed")]
    ChannelClosed,

    /// Outbound buffer is full; the frame was dropped.
    #[error("Outbound buffer full")]
    Backpressure,

    /// Message could not be serialized.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Non-blocking message transport.
pub trait Transport: Send {
    /// Open the connection.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Check if the connection is open.
    fn is_connected(&self) -> bool;

    /// Queue a message for sending.
    fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError>;

    /// Take every message received since the last poll.
    fn poll(&mut self) -> Vec<ServerMessage>;
}

/// Socket-task side of a `ChannelTransport`.
#[derive(Debug)]
pub struct TransportPeer {
    /// Frames the client wants on the wire
    pub outbound: mpsc::Receiver<String>,
    /// Frames received from the wire
    pub inbound: mpsc::Sender<String>,
}

/// Transport backed by a pair of bounded channels.
#[derive(Debug)]
pub struct ChannelTransport {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<String>,
    connected: bool,
    closed: bool,
}

impl ChannelTransport {
    /// Create a transport and the peer a socket task drives.
    pub fn pair() -> (Self, TransportPeer) {
        let (out_tx, out_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let transport = Self {
            outbound: out_tx,
            inbound: in_rx,
            connected: false,
            closed: false,
        };
        let peer = TransportPeer {
            outbound: out_rx,
            inbound: in_tx,
        };
        (transport, peer)
    }
}

impl Transport for ChannelTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.closed || self.outbound.is_closed() {
            return Err(TransportError::ChannelClosed);
        }
        self.connected = true;
        debug!("Presence transport connected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }

        let frame = message.to_json()?;
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => {
                self.connected = false;
                self.closed = true;
                TransportError::ChannelClosed
            }
        })
    }

    fn poll(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();

        loop {
            match self.inbound.try_recv() {
                Ok(frame) => match ServerMessage::from_json(&frame) {
                    Ok(message) => messages.push(message),
                    Err(e) => warn!("Dropping malformed frame: {}", e),
                },
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if !self.closed {
                        self.closed = true;
                        if self.connected {
                            messages.push(ServerMessage::Disconnect);
                        }
                    }
                    self.connected = false;
                    break;
                }
            }
        }

        messages
    }
}

/// Transport for offline play: never connects, never receives.
#[derive(Debug, Default)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn send(&mut self, _message: &ClientMessage) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn poll(&mut self) -> Vec<ServerMessage> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_requires_connect() {
        let (mut transport, _peer) = ChannelTransport::pair();
        let msg = ClientMessage::ChatMessage { text: "hi".to_string() };

        assert!(matches!(transport.send(&msg), Err(TransportError::NotConnected)));
        transport.connect().unwrap();
        transport.send(&msg).unwrap();
    }

    #[test]
    fn test_frames_cross_the_channel() {
        let (mut transport, mut peer) = ChannelTransport::pair();
        transport.connect().unwrap();

        transport.send(&ClientMessage::ChatMessage { text: "down here".to_string() }).unwrap();
        let frame = peer.outbound.try_recv().unwrap();
        assert_eq!(ClientMessage::from_json(&frame).unwrap(), ClientMessage::ChatMessage { text: "down here".to_string() });

        peer.inbound.try_send(r#"{"type":"playerLeft","id":"c9"}"#.to_string()).unwrap();
        peer.inbound.try_send("not json".to_string()).unwrap();
        peer.inbound.try_send(r#"{"type":"disconnect"}"#.to_string()).unwrap();

        let received = transport.poll();
        assert_eq!(
            received,
            vec![ServerMessage::PlayerLeft { id: "c9".to_string() }, ServerMessage::Disconnect]
        );
        assert!(transport.poll().is_empty());
    }

    #[test]
    fn test_peer_drop_reports_disconnect_once() {
        let (mut transport, peer) = ChannelTransport::pair();
        transport.connect().unwrap();
        drop(peer);

        assert_eq!(transport.poll(), vec![ServerMessage::Disconnect]);
        assert!(transport.poll().is_empty());
        assert!(!transport.is_connected());
        assert!(matches!(transport.connect(), Err(TransportError::ChannelClosed)));
    }

    #[test]
    fn test_backpressure() {
        let (mut transport, _peer) = ChannelTransport::pair();
        transport.connect().unwrap();
        let msg = ClientMessage::ChatMessage { text: "spam".to_string() };

        for _ in 0..CHANNEL_CAPACITY {
            transport.send(&msg).unwrap();
        }
        assert!(matches!(transport.send(&msg), Err(TransportError::Backpressure)));
    }

    #[test]
    fn test_offline_transport() {
        let mut transport = OfflineTransport;
        assert!(transport.connect().is_err());
        assert!(transport.poll().is_empty());
    }
}
