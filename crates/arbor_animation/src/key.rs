use glam::{Quat, Vec3};

/// A single pose sample of an animation channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    /// Time of the sample, in the same units as [`Animation::duration`](crate::Animation::duration).
    pub time: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Key {
    #[must_use]
    pub fn new(time: f32, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            time,
            position,
            rotation,
            scale,
        }
    }

    /// A key that only moves the target, with identity rotation and unit scale.
    #[must_use]
    pub fn from_position(time: f32, position: Vec3) -> Self {
        Self::new(time, position, Quat::IDENTITY, Vec3::ONE)
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::new(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}
