//! # DRIFTLINE Core
//!
//! The body boundary of the DRIFTLINE movement simulation.
//!
//! The netcode crate never talks to a physics engine directly. It simulates
//! against the [`MovableBody`] capability: read the body's state, apply an
//! impulse, advance it by a fixed duration. Anything that implements the
//! trait deterministically can be predicted and replayed.
//!
//! [`BoxBody`] is the reference implementation: a unit rigid body integrated
//! with semi-implicit Euler over a flat ground plane. It exists so the rest
//! of the workspace has something deterministic to test and bench against.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod body;
pub mod pose;

pub use body::{BoxBody, MovableBody, RigidState, GRAVITY};
pub use pose::Pose;
