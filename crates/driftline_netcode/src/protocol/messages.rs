//! # Message Definitions
//!
//! In-memory message types and their fixed-size wire records.
//!
//! Wire records are `Pod` so the codec can copy them in and out of frame
//! buffers without field-by-field shuffling; the in-memory types use the
//! workspace math types and `bool` flags.

use bytemuck::{Pod, Zeroable};
use driftline_core::RigidState;
use glam::{Quat, Vec3};

/// One sampled input frame: five independent boolean flags, immutable once
/// captured. Produced once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSample {
    /// Move along the steering frame's forward axis.
    pub forward: bool,
    /// Move against the steering frame's forward axis.
    pub backward: bool,
    /// Strafe along the steering frame's right axis.
    pub strafe_right: bool,
    /// Strafe against the steering frame's right axis.
    pub strafe_left: bool,
    /// Jump, if the body is low enough to count as grounded.
    pub jump: bool,
}

impl InputSample {
    /// The neutral sample: no flags set.
    pub const NEUTRAL: Self = Self {
        forward: false,
        backward: false,
        strafe_right: false,
        strafe_left: false,
        jump: false,
    };

    /// Returns true if any flag is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.forward || self.backward || self.strafe_right || self.strafe_left || self.jump
    }
}

/// Wire form of an input record: five 4-byte 0/1 integers in fixed order.
///
/// Size: 20 bytes
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct WireInput {
    /// Forward flag, 0 or 1.
    pub forward: i32,
    /// Backward flag, 0 or 1.
    pub backward: i32,
    /// Strafe-right flag, 0 or 1.
    pub strafe_right: i32,
    /// Strafe-left flag, 0 or 1.
    pub strafe_left: i32,
    /// Jump flag, 0 or 1.
    pub jump: i32,
}

impl WireInput {
    /// Size in bytes.
    pub const SIZE: usize = 20;
}

impl From<InputSample> for WireInput {
    fn from(sample: InputSample) -> Self {
        Self {
            forward: i32::from(sample.forward),
            backward: i32::from(sample.backward),
            strafe_right: i32::from(sample.strafe_right),
            strafe_left: i32::from(sample.strafe_left),
            jump: i32::from(sample.jump),
        }
    }
}

impl From<WireInput> for InputSample {
    fn from(wire: WireInput) -> Self {
        Self {
            forward: wire.forward != 0,
            backward: wire.backward != 0,
            strafe_right: wire.strafe_right != 0,
            strafe_left: wire.strafe_left != 0,
            jump: wire.jump != 0,
        }
    }
}

/// Client -> authority: one input record per tick for the inclusive range
/// starting at `start_tick`.
///
/// With redundant transmission the range opens at the latest acknowledged
/// tick, so a dropped frame's inputs ride along with every later frame
/// until the authority confirms them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputMessage {
    /// First tick covered by `inputs`.
    pub start_tick: u32,
    /// One record per tick from `start_tick` upward. Never empty.
    pub inputs: Vec<InputSample>,
}

impl InputMessage {
    /// Last tick covered by this message.
    #[must_use]
    pub fn last_tick(&self) -> u32 {
        self.start_tick + self.inputs.len() as u32 - 1
    }
}

/// Authority -> client: the ground-truth body state at the beginning of
/// `tick`, before that tick's input is applied.
///
/// Receiving one acknowledges every tick up to and including `tick`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateMessage {
    /// Tick this state is the ground truth for.
    pub tick: u32,
    /// Body position.
    pub position: Vec3,
    /// Body orientation (unit quaternion).
    pub rotation: Quat,
    /// Body linear velocity.
    pub velocity: Vec3,
    /// Body angular velocity.
    pub angular_velocity: Vec3,
}

impl StateMessage {
    /// Builds a snapshot of a body state for the given tick.
    #[must_use]
    pub const fn from_state(tick: u32, state: RigidState) -> Self {
        Self {
            tick,
            position: state.position,
            rotation: state.rotation,
            velocity: state.velocity,
            angular_velocity: state.angular_velocity,
        }
    }

    /// The body state this snapshot carries.
    #[must_use]
    pub const fn body_state(&self) -> RigidState {
        RigidState {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }
}

/// Wire form of a state message body: tick then thirteen floats.
///
/// Size: 56 bytes
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct WireState {
    /// Tick the state belongs to.
    pub tick: i32,
    /// Position x, y, z.
    pub position: [f32; 3],
    /// Rotation quaternion x, y, z, w.
    pub rotation: [f32; 4],
    /// Linear velocity x, y, z.
    pub velocity: [f32; 3],
    /// Angular velocity x, y, z.
    pub angular_velocity: [f32; 3],
}

impl WireState {
    /// Size in bytes.
    pub const SIZE: usize = 56;
}

impl From<&StateMessage> for WireState {
    fn from(msg: &StateMessage) -> Self {
        Self {
            tick: msg.tick as i32,
            position: msg.position.to_array(),
            rotation: msg.rotation.to_array(),
            velocity: msg.velocity.to_array(),
            angular_velocity: msg.angular_velocity.to_array(),
        }
    }
}

impl WireState {
    /// Converts back to the in-memory form. The caller validates the tick
    /// sign before calling.
    #[must_use]
    pub fn into_message(self) -> StateMessage {
        StateMessage {
            tick: self.tick as u32,
            position: Vec3::from_array(self.position),
            rotation: Quat::from_array(self.rotation),
            velocity: Vec3::from_array(self.velocity),
            angular_velocity: Vec3::from_array(self.angular_velocity),
        }
    }
}
