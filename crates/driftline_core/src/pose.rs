//! Position + orientation pair.

use glam::{Quat, Vec3};

/// A world-space position and orientation.
///
/// Used both for recorded pre-step body states and for the visual pose
/// handed to a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation (unit quaternion).
    pub rotation: Quat,
}

impl Pose {
    /// The origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a pose from its parts.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_default() {
        let pose = Pose::default();
        assert_eq!(pose.position, Vec3::ZERO);
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }
}
