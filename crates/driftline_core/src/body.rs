//! # Movable Body Capability
//!
//! The injected physics boundary: the netcode reads a body's state, pushes
//! impulses into it and steps it by a fixed duration. It never depends on a
//! concrete physics engine.
//!
//! ## Determinism Contract
//!
//! `step(dt)` must be a pure function of the body's current state and `dt`:
//! identical state plus identical inputs plus identical dt produces
//! bit-identical results, every time, on every replay. No clocks, no
//! randomness, no global state.

use glam::{Quat, Vec3};

use crate::pose::Pose;

/// Gravity acceleration applied by the reference stepper (world units per
/// second squared, negative is down).
pub const GRAVITY: f32 = -20.0;

/// Full dynamic state of a movable body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidState {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation (unit quaternion).
    pub rotation: Quat,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Angular velocity (scaled axis, radians per second).
    pub angular_velocity: Vec3,
}

impl RigidState {
    /// A body at rest at the origin.
    pub const AT_REST: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        velocity: Vec3::ZERO,
        angular_velocity: Vec3::ZERO,
    };

    /// Creates a state at rest at the given position.
    #[inline]
    #[must_use]
    pub const fn resting_at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl Default for RigidState {
    fn default() -> Self {
        Self::AT_REST
    }
}

/// A body the simulation can read, push and deterministically advance.
pub trait MovableBody {
    /// Returns the body's full dynamic state.
    fn state(&self) -> RigidState;

    /// Overwrites the body's full dynamic state. Used when snapping to an
    /// authoritative snapshot.
    fn set_state(&mut self, state: RigidState);

    /// Applies an instantaneous impulse along the given world-space vector.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Advances the body by `dt` seconds. Must honor the determinism
    /// contract in the module docs.
    fn step(&mut self, dt: f32);

    /// Returns the body's position and orientation.
    fn pose(&self) -> Pose {
        let state = self.state();
        Pose::new(state.position, state.rotation)
    }
}

/// Reference body: a unit-mass box over a flat ground plane at y = 0.
///
/// Semi-implicit Euler integration with constant gravity. Ground contact
/// clamps the body to the plane and kills downward velocity; there is no
/// restitution and no damping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxBody {
    state: RigidState,
}

impl BoxBody {
    /// Creates a body at rest at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RigidState::AT_REST,
        }
    }

    /// Creates a body at rest at the given position.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            state: RigidState::resting_at(position),
        }
    }
}

impl MovableBody for BoxBody {
    fn state(&self) -> RigidState {
        self.state
    }

    fn set_state(&mut self, state: RigidState) {
        self.state = state;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        // Unit mass: an impulse is a velocity change.
        self.state.velocity += impulse;
    }

    fn step(&mut self, dt: f32) {
        self.state.velocity.y += GRAVITY * dt;
        self.state.position += self.state.velocity * dt;

        self.state.rotation = (self.state.rotation
            * Quat::from_scaled_axis(self.state.angular_velocity * dt))
        .normalize();

        // Ground plane contact.
        if self.state.position.y < 0.0 {
            self.state.position.y = 0.0;
            if self.state.velocity.y < 0.0 {
                self.state.velocity.y = 0.0;
            }
        }
    }
}
