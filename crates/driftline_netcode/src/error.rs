//! Error taxonomy for the netcode crate.
//!
//! Nothing here is fatal to a running simulation: decode failures discard
//! the offending frame, transport failures skip the send, and the tick loop
//! carries on predicting either way.

use thiserror::Error;

/// A frame that could not be fully decoded. The whole frame is discarded;
/// nothing is partially applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The frame ended before a field could be read.
    #[error("frame truncated mid-field")]
    Truncated,
    /// The leading kind byte matched no known message kind.
    #[error("unknown message kind {0:#04x}")]
    UnknownKind(u8),
    /// A tick field decoded to a negative value.
    #[error("negative tick {0}")]
    NegativeTick(i32),
    /// The input count field was non-positive or larger than the history
    /// window.
    #[error("input count {0} out of range")]
    BadCount(i32),
    /// Bytes remained after the message was fully read.
    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),
}

/// Transport-level failure.
#[derive(Debug, Error)]
pub enum NetError {
    /// The underlying socket failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    /// A message did not fit the frame buffer. Cannot happen for input
    /// windows bounded by the history capacity.
    #[error("frame exceeded maximum size")]
    Oversize,
}

/// Configuration that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source did not parse into a configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
