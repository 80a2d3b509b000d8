use arbor_scene::NodeHandle;
use glam::{Quat, Vec3};

/// Per-node pose slot of a [`Skeleton`](crate::Skeleton).
///
/// `written` is set when a pose was computed this step and cleared when
/// [`Skeleton::update_graph`](crate::Skeleton::update_graph) consumes it.
/// The target is a plain handle: the skeleton never owns the node it drives,
/// and a destroyed target just turns the handle stale.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedKey {
    pub(crate) name: String,
    pub(crate) written: bool,
    pub(crate) position: Vec3,
    pub(crate) rotation: Quat,
    pub(crate) scale: Vec3,
    pub(crate) target: Option<NodeHandle>,
}

impl InterpolatedKey {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            written: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            target: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn written(&self) -> bool {
        self.written
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeHandle> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<NodeHandle>) {
        self.target = target;
    }

    /// Stores a pose and marks the slot written.
    pub(crate) fn set_pose(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.written = true;
    }

    pub(crate) fn copy_pose(&mut self, other: &InterpolatedKey) {
        self.set_pose(other.position, other.rotation, other.scale);
    }
}
