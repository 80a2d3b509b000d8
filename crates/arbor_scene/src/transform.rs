//! Local and world transform accessors for graph nodes.
//!
//! Local setters write TRS directly and invalidate. World setters convert the
//! requested world value into the parent's space first, so a parented node
//! reads back exactly what was written. Euler angles are XYZ, in radians.
//!
//! All methods silently no-op (or return `None`) on a stale handle.

use arbor_core::math;
use glam::{Quat, Vec3};

use crate::graph::SceneGraph;
use crate::sync_queue::SyncQueue;
use crate::NodeHandle;

impl<Q: SyncQueue> SceneGraph<Q> {
    // ========================================================================
    // Local Setters
    // ========================================================================

    pub fn set_local_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_position = position;
            self.dirtify_local(handle);
        }
    }

    pub fn set_local_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_rotation = rotation;
            self.dirtify_local(handle);
        }
    }

    pub fn set_local_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_scale = scale;
            self.dirtify_local(handle);
        }
    }

    pub fn set_local_euler_angles(&mut self, handle: NodeHandle, angles: Vec3) {
        self.set_local_rotation(handle, math::quat_from_euler(angles));
    }

    /// Writes a full local pose with a single invalidation. Returns false
    /// for a stale handle.
    pub fn set_local_trs(&mut self, handle: NodeHandle, position: Vec3, rotation: Quat, scale: Vec3) -> bool {
        let Some(node) = self.nodes.get_mut(handle) else {
            return false;
        };
        node.local_position = position;
        node.local_rotation = rotation;
        node.local_scale = scale;
        self.dirtify_local(handle);
        true
    }

    /// Opts the node in or out of scale compensation.
    pub fn set_scale_compensation(&mut self, handle: NodeHandle, enabled: bool) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };
        if node.scale_compensation != enabled {
            node.scale_compensation = enabled;
            self.dirtify_world(handle);
        }
    }

    // ========================================================================
    // World Setters
    // ========================================================================

    /// Places the node at world position `position`.
    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        let Some(parent) = self.nodes.get(handle).map(|n| n.parent) else {
            return;
        };
        let local = match parent.and_then(|p| self.world_transform(p)) {
            Some(parent_world) => math::invert_or_identity(&parent_world).transform_point3(position),
            None => position,
        };
        self.set_local_position(handle, local);
    }

    /// Sets the node's world rotation.
    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        let Some(parent) = self.nodes.get(handle).map(|n| n.parent) else {
            return;
        };
        let local = match parent.and_then(|p| self.rotation(p)) {
            Some(parent_rotation) => parent_rotation.inverse() * rotation,
            None => rotation,
        };
        self.set_local_rotation(handle, local);
    }

    /// Sets the node's world rotation from XYZ euler angles.
    pub fn set_euler_angles(&mut self, handle: NodeHandle, angles: Vec3) {
        self.set_rotation(handle, math::quat_from_euler(angles));
    }

    // ========================================================================
    // Incremental Mutators
    // ========================================================================

    /// Moves the node by `delta` in world space.
    pub fn translate(&mut self, handle: NodeHandle, delta: Vec3) {
        if let Some(position) = self.position(handle) {
            self.set_position(handle, position + delta);
        }
    }

    /// Moves the node by `delta` expressed in its own local axes.
    pub fn translate_local(&mut self, handle: NodeHandle, delta: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_position += node.local_rotation * delta;
            self.dirtify_local(handle);
        }
    }

    /// Rotates the node by XYZ euler `angles` about world axes.
    pub fn rotate(&mut self, handle: NodeHandle, angles: Vec3) {
        let Some(parent) = self.nodes.get(handle).map(|n| n.parent) else {
            return;
        };
        let delta = math::quat_from_euler(angles);

        let local = match parent.and_then(|p| self.rotation(p)) {
            Some(parent_rotation) => {
                let world = self.rotation(handle).unwrap_or(Quat::IDENTITY);
                parent_rotation.inverse() * delta * world
            }
            None => {
                let local = self.nodes.get(handle).map_or(Quat::IDENTITY, |n| n.local_rotation);
                delta * local
            }
        };
        self.set_local_rotation(handle, local);
    }

    /// Rotates the node by XYZ euler `angles` about its own local axes.
    pub fn rotate_local(&mut self, handle: NodeHandle, angles: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_rotation *= math::quat_from_euler(angles);
            self.dirtify_local(handle);
        }
    }

    /// Turns the node so its -Z axis points at world-space `target`.
    ///
    /// No-op when the node sits on the target or `up` is parallel to the
    /// view direction.
    pub fn look_at(&mut self, handle: NodeHandle, target: Vec3, up: Vec3) {
        let Some(eye) = self.position(handle) else {
            return;
        };
        if let Some(rotation) = math::look_rotation(eye, target, up) {
            self.set_rotation(handle, rotation);
        }
    }

    // ========================================================================
    // World Readers
    // ========================================================================

    #[must_use]
    pub fn local_euler_angles(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.local_euler_angles())
    }

    pub fn position(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle).map(|m| math::translation(&m))
    }

    pub fn rotation(&mut self, handle: NodeHandle) -> Option<Quat> {
        self.world_transform(handle).map(|m| math::world_rotation(&m))
    }

    pub fn euler_angles(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.rotation(handle).map(math::euler_from_quat)
    }

    /// World scale: lengths of the world matrix basis columns.
    pub fn scale(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle).map(|m| math::world_scale(&m))
    }

    /// World-space +X axis of the node, normalized.
    pub fn right(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle)
            .map(|m| m.x_axis.truncate().normalize_or_zero())
    }

    /// World-space +Y axis of the node, normalized.
    pub fn up(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle)
            .map(|m| m.y_axis.truncate().normalize_or_zero())
    }

    /// World-space -Z axis of the node, normalized.
    pub fn forward(&mut self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle)
            .map(|m| -m.z_axis.truncate().normalize_or_zero())
    }
}
