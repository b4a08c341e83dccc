//! # Wire Protocol
//!
//! The two message kinds exchanged between a predicting client and its
//! authority, and the codec that frames them.
//!
//! Every frame opens with a one-byte kind discriminant so a single inbound
//! stream can tell input frames from state frames. Payloads are
//! little-endian: ticks are 4-byte signed integers, input flags are 4-byte
//! 0/1 integers, spatial values are 4-byte floats.

pub mod codec;
pub mod messages;

pub use codec::{FrameReader, FrameWriter, MAX_FRAME_SIZE};
pub use messages::{InputMessage, InputSample, StateMessage, WireInput, WireState};

/// Kind discriminant leading every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    /// Client -> authority: inputs for a range of ticks.
    Input = 0,
    /// Authority -> client: ground-truth body state for one tick.
    State = 1,
}

impl MessageKind {
    /// Decodes a kind byte. Returns `None` for unknown kinds.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Input),
            1 => Some(Self::State),
            _ => None,
        }
    }
}

/// A fully decoded inbound frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// Inputs for a range of ticks.
    Input(InputMessage),
    /// Ground-truth state for one tick.
    State(StateMessage),
}

impl Message {
    /// Returns the frame's kind discriminant.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Input(_) => MessageKind::Input,
            Self::State(_) => MessageKind::State,
        }
    }
}
