//! # Error Smoothing
//!
//! A correction that teleports the body is correct but ugly. The error
//! offset keeps the visible pose where the player last saw it and decays
//! the difference away over a couple dozen ticks, without ever touching
//! the simulated body the physics runs on.

use driftline_core::Pose;
use glam::{Quat, Vec3};

/// Per-tick multiplier on the positional offset.
pub const POSITION_DECAY: f32 = 0.9;

/// Per-tick interpolation fraction of the rotational offset toward
/// identity.
pub const ROTATION_DECAY: f32 = 0.1;

/// Visual-only pose delta between the simulated body and what the player
/// sees. Never fed back into the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorOffset {
    /// Positional part, added to the body's position.
    pub position: Vec3,
    /// Rotational part, composed onto the body's rotation.
    pub rotation: Quat,
}

impl ErrorOffset {
    /// No offset: the visible pose equals the simulated pose.
    pub const ZERO: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Returns true when the offset is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.position == Vec3::ZERO && self.rotation == Quat::IDENTITY
    }

    /// Drops the offset entirely: the next rendered frame cuts straight to
    /// the simulated pose.
    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }

    /// Decays one tick's worth: the exponential fall-off absorbs a
    /// correction within roughly 20-30 ticks without overshoot.
    pub fn decay(&mut self) {
        self.position *= POSITION_DECAY;
        self.rotation = self.rotation.slerp(Quat::IDENTITY, ROTATION_DECAY);
    }

    /// Composes the offset onto a simulated pose, yielding the pose to
    /// render.
    #[must_use]
    pub fn apply_to(&self, pose: Pose) -> Pose {
        Pose::new(pose.position + self.position, pose.rotation * self.rotation)
    }
}

impl Default for ErrorOffset {
    fn default() -> Self {
        Self::ZERO
    }
}
