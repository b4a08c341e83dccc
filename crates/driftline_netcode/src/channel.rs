//! # Inbound Event Channel
//!
//! The simulation core never polls a connection handle. Whatever owns the
//! transport (a socket pump, a test harness, a bot driver) pushes typed
//! events into this channel; the client drains it completely once per
//! update, before running any catch-up ticks, and handles each event
//! synchronously and completely before the next.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::protocol::StateMessage;

/// Connection lifecycle and data events delivered to the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NetEvent {
    /// The transport established a connection; input transmission starts.
    Connected,
    /// An authoritative state snapshot arrived.
    State(StateMessage),
    /// The connection dropped; sends stop until a new `Connected` arrives.
    /// Local prediction continues regardless.
    Disconnected,
}

/// Single-consumer queue of inbound events.
///
/// Uses crossbeam so producers on other threads (or the same one) can push
/// without the consumer holding any lock.
pub struct EventQueue {
    sender: Sender<NetEvent>,
    receiver: Receiver<NetEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Returns a handle producers push events through.
    #[must_use]
    pub fn sender(&self) -> Sender<NetEvent> {
        self.sender.clone()
    }

    /// Pops the next pending event, if any. Never blocks.
    #[must_use]
    pub fn next_event(&self) -> Option<NetEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
