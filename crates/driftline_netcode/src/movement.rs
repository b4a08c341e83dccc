//! # Movement Forces
//!
//! The one force-application routine shared by every path that simulates a
//! tick: local prediction, reconciliation replay, and the authority. A
//! single shared routine is what makes replay deterministic — there is no
//! second copy to drift out of sync.

use driftline_core::MovableBody;
use glam::Vec3;

use crate::config::SimConfig;
use crate::protocol::InputSample;

/// The basis movement impulses are expressed in, typically derived from
/// the active camera by the rendering collaborator. The simulation reads
/// it each tick; it never owns or updates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringFrame {
    /// Forward axis.
    pub forward: Vec3,
    /// Right axis.
    pub right: Vec3,
    /// Up axis, used for jump impulses.
    pub up: Vec3,
}

impl SteeringFrame {
    /// World axes: forward is -Z, right is +X, up is +Y.
    pub const WORLD: Self = Self {
        forward: Vec3::NEG_Z,
        right: Vec3::X,
        up: Vec3::Y,
    };

    /// Creates a frame from explicit axes.
    #[must_use]
    pub const fn new(forward: Vec3, right: Vec3, up: Vec3) -> Self {
        Self { forward, right, up }
    }
}

impl Default for SteeringFrame {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Applies one tick's movement impulses to the body.
///
/// Each active direction contributes one impulse of `move_force` along the
/// steering frame's axis. The jump impulse only applies while the body is
/// at or below `jump_threshold`, approximating a grounded check.
pub fn apply_movement(
    body: &mut dyn MovableBody,
    input: InputSample,
    frame: &SteeringFrame,
    config: &SimConfig,
) {
    let force = config.move_force;

    if input.forward {
        body.apply_impulse(frame.forward * force);
    }
    if input.backward {
        body.apply_impulse(-frame.forward * force);
    }
    if input.strafe_right {
        body.apply_impulse(frame.right * force);
    }
    if input.strafe_left {
        body.apply_impulse(-frame.right * force);
    }
    if input.jump && body.state().position.y <= config.jump_threshold {
        body.apply_impulse(frame.up * force);
    }
}
