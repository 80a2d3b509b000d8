use glam::{Mat3, Mat4, Quat, Vec3};
use rustc_hash::FxHashSet;

use crate::NodeHandle;

/// A spatial node of the transform hierarchy.
///
/// # Ownership
///
/// Nodes live in a [`SceneGraph`](crate::SceneGraph) arena and refer to each
/// other through [`NodeHandle`]s. A node has at most one parent; the parent's
/// `children` list is the only owner-side link and its order is insertion
/// order. Hierarchy links are changed only through the graph's mutators,
/// which keep both sides in sync.
///
/// # Transform State
///
/// - Local TRS (`local_position`, `local_rotation`, `local_scale`) is
///   authoritative. Euler angles are derived from the rotation on request.
/// - `local_transform` and `world_transform` are caches guarded by
///   `dirty_local` and `dirty_world`. `dirty_local` implies `dirty_world`.
/// - World position, rotation, scale and the normal matrix are derived from
///   `world_transform` when read through the graph.
///
/// Setters that change the transform live on the graph, because
/// invalidation has to reach descendants and the sync queue.
#[derive(Debug, Clone)]
pub struct GraphNode {
    // === Identity ===
    pub(crate) name: String,
    pub(crate) tags: FxHashSet<String>,
    pub(crate) labels: FxHashSet<String>,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) graph_depth: u32,

    // === Local State ===
    pub(crate) local_position: Vec3,
    pub(crate) local_rotation: Quat,
    pub(crate) local_scale: Vec3,

    // === Matrix Cache ===
    pub(crate) local_transform: Mat4,
    pub(crate) world_transform: Mat4,
    pub(crate) normal_matrix: Mat3,

    // === Dirty State ===
    pub(crate) dirty_local: bool,
    pub(crate) dirty_world: bool,
    pub(crate) dirty_normal: bool,

    // === Flags ===
    pub(crate) enabled: bool,
    pub(crate) enabled_in_hierarchy: bool,
    pub(crate) scale_compensation: bool,

    // === Versioning ===
    pub(crate) aabb_version: u32,
    pub(crate) world_version: u64,
}

impl GraphNode {
    /// Creates a standalone node: no parent, identity transform, enabled.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: FxHashSet::default(),
            labels: FxHashSet::default(),

            parent: None,
            children: Vec::new(),
            graph_depth: 0,

            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,

            local_transform: Mat4::IDENTITY,
            world_transform: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,

            dirty_local: false,
            dirty_world: false,
            dirty_normal: false,

            enabled: true,
            enabled_in_hierarchy: true,
            scale_compensation: false,

            aabb_version: 0,
            world_version: 0,
        }
    }

    // ========================================================================
    // Identity
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    pub fn add_tag(&mut self, tag: &str) {
        self.tags.insert(tag.to_string());
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn add_label(&mut self, label: &str) {
        self.labels.insert(label.to_string());
    }

    pub fn remove_label(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles, in insertion order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Distance from the root of the tree this node belongs to.
    #[inline]
    #[must_use]
    pub fn graph_depth(&self) -> u32 {
        self.graph_depth
    }

    // ========================================================================
    // Local State
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    #[inline]
    #[must_use]
    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    #[inline]
    #[must_use]
    pub fn local_scale(&self) -> Vec3 {
        self.local_scale
    }

    /// Local rotation as XYZ euler angles in radians.
    #[inline]
    #[must_use]
    pub fn local_euler_angles(&self) -> Vec3 {
        arbor_core::math::euler_from_quat(self.local_rotation)
    }

    // ========================================================================
    // Flags
    // ========================================================================

    /// Effective enabled state: the node's own toggle and every ancestor's.
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled && self.enabled_in_hierarchy
    }

    /// The node's own toggle, regardless of its ancestors.
    #[inline]
    #[must_use]
    pub fn enabled_self(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub fn enabled_in_hierarchy(&self) -> bool {
        self.enabled_in_hierarchy
    }

    #[inline]
    #[must_use]
    pub fn scale_compensation(&self) -> bool {
        self.scale_compensation
    }

    // ========================================================================
    // Cache State
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_dirty_local(&self) -> bool {
        self.dirty_local
    }

    #[inline]
    #[must_use]
    pub fn is_dirty_world(&self) -> bool {
        self.dirty_world
    }

    /// Bumped every time this node's world matrix is invalidated.
    #[inline]
    #[must_use]
    pub fn aabb_version(&self) -> u32 {
        self.aabb_version
    }

    /// Graph-wide stamp of the last world-matrix recomputation, 0 if never.
    #[inline]
    #[must_use]
    pub fn world_version(&self) -> u64 {
        self.world_version
    }

    /// Last resolved world matrix. May be stale; use
    /// [`SceneGraph::world_transform`](crate::SceneGraph::world_transform)
    /// for the current value.
    #[inline]
    #[must_use]
    pub fn cached_world_transform(&self) -> &Mat4 {
        &self.world_transform
    }
}

impl Default for GraphNode {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
