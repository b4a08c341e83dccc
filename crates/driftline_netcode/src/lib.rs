//! # DRIFTLINE Netcode
//!
//! Client-side prediction with server reconciliation for networked movement.
//!
//! ## How It Works
//!
//! 1. The client samples input on a fixed tick and simulates it immediately
//! 2. Every tick's input and pre-step body state go into history rings
//! 3. Inputs stream to the authority, optionally with a redundant tail
//! 4. The authority simulates the same inputs and sends back ground truth
//! 5. When truth disagrees with history, the client rewinds and replays
//!
//! ```text
//! sample ─► predict ─► history ─► transmit ──(network)──► authority
//!               ▲                                             │
//!               │           rewind + replay                   │
//!               └── reconcile ◄───────────(network)───────────┘
//!                      │
//!                      ▼
//!               error offset ─► render pose (visual only)
//! ```
//!
//! The authority is never argued with. A divergent snapshot resets the body
//! and deterministically re-simulates every recorded tick since; the visible
//! jump is folded into a decaying render-only offset so the player sees a
//! glide instead of a cut.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod authority;
pub mod channel;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod movement;
pub mod protocol;
pub mod reconcile;
pub mod smoothing;
pub mod transport;

// Re-exports for convenience
pub use authority::Authority;
pub use channel::{EventQueue, NetEvent};
pub use client::{InputSource, PredictedClient};
pub use clock::TickClock;
pub use config::SimConfig;
pub use error::{ConfigError, DecodeError, NetError};
pub use history::{History, TickRing};
pub use movement::SteeringFrame;
pub use protocol::{
    FrameReader, FrameWriter, InputMessage, InputSample, Message, MessageKind, StateMessage,
};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use smoothing::ErrorOffset;
pub use transport::UdpLink;

/// Number of ticks of input and state history retained for replay.
///
/// A snapshot referencing a tick older than this window is aliased by newer
/// data and is rejected rather than compared.
pub const HISTORY_CAPACITY: usize = 1024;

/// Default fixed simulation rate (ticks per second).
pub const DEFAULT_TICK_RATE: u32 = 60;
