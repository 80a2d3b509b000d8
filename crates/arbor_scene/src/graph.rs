//! Scene graph arena and hierarchy mutation.
//!
//! [`SceneGraph`] owns every [`GraphNode`] and the injected [`SyncQueue`].
//! Parent/child links change only through the mutators in this module:
//! `add_child`, `insert_child`, `remove_child`, `reparent`,
//! `add_child_and_save_transform` and `destroy`.
//!
//! Attaching a node that already has a parent is rejected before anything is
//! touched. `reparent` and `add_child_and_save_transform` detach explicitly
//! first and are the only way to move a parented node.

use arbor_core::{ArborError, Result};
use glam::{Quat, Vec3};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::node::GraphNode;
use crate::sync_queue::{DepthSyncQueue, SyncQueue};
use crate::NodeHandle;

/// Construction options for a [`SceneGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSettings {
    /// Number of nodes the arena reserves up front.
    pub node_capacity: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self { node_capacity: 64 }
    }
}

/// Arena of [`GraphNode`]s plus the sync queue they report to.
///
/// The queue is a plain value owned by the graph; hosts that need to inspect
/// or drain it themselves use [`queue`](Self::queue) /
/// [`queue_mut`](Self::queue_mut), or take it back with
/// [`into_queue`](Self::into_queue).
#[derive(Debug)]
pub struct SceneGraph<Q: SyncQueue = DepthSyncQueue> {
    pub(crate) nodes: SlotMap<NodeHandle, GraphNode>,
    pub(crate) queue: Q,
    /// Source of `GraphNode::world_version` stamps.
    pub(crate) sync_stamp: u64,
}

impl Default for SceneGraph<DepthSyncQueue> {
    fn default() -> Self {
        Self::new(DepthSyncQueue::new())
    }
}

impl<Q: SyncQueue> SceneGraph<Q> {
    #[must_use]
    pub fn new(queue: Q) -> Self {
        Self::with_settings(queue, &GraphSettings::default())
    }

    #[must_use]
    pub fn with_settings(queue: Q, settings: &GraphSettings) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(settings.node_capacity),
            queue,
            sync_stamp: 0,
        }
    }

    // ========================================================================
    // Node Access
    // ========================================================================

    /// Creates a standalone node with an identity transform.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        self.nodes.insert(GraphNode::new(name))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&GraphNode> {
        self.nodes.get(handle)
    }

    /// Mutable access for identity data (name, tags, labels). Transform and
    /// hierarchy state is not reachable through this reference.
    #[inline]
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut GraphNode> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &GraphNode)> {
        self.nodes.iter()
    }

    /// Every node without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(handle, _)| handle)
    }

    #[inline]
    #[must_use]
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    #[inline]
    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    #[must_use]
    pub fn into_queue(self) -> Q {
        self.queue
    }

    fn name_of(&self, handle: NodeHandle) -> String {
        self.nodes
            .get(handle)
            .map_or_else(|| format!("{handle:?}"), |node| node.name.clone())
    }

    // ========================================================================
    // Hierarchy Mutation
    // ========================================================================

    /// Appends `child` to `parent`'s children.
    ///
    /// Fails with [`ArborError::AlreadyParented`] if `child` has a parent.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.check_attach(parent, child, false)?;
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        self.on_insert_child(parent, child);
        Ok(())
    }

    /// Inserts `child` at `index` in `parent`'s children. An index past the
    /// end appends.
    pub fn insert_child(&mut self, parent: NodeHandle, child: NodeHandle, index: usize) -> Result<()> {
        self.check_attach(parent, child, false)?;
        if let Some(p) = self.nodes.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        self.on_insert_child(parent, child);
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns false (and does nothing) if
    /// `child` is not one of `parent`'s children.
    ///
    /// The detached node becomes a root: its world transform equals its local
    /// transform on the next resolve.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> bool {
        let Some(p) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(index) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(index);
        self.on_detach(child);
        true
    }

    /// Moves `child` under `parent` (or makes it a root when `parent` is
    /// `None`), detaching it from its current parent first.
    ///
    /// With `index` the child is inserted at that position, otherwise
    /// appended. Validation happens before the detach, so a rejected
    /// reparent leaves the old hierarchy intact.
    pub fn reparent(&mut self, child: NodeHandle, parent: Option<NodeHandle>, index: Option<usize>) -> Result<()> {
        let Some(current) = self.nodes.get(child).map(|n| n.parent) else {
            return Err(ArborError::InvalidHandle(format!("{child:?}")));
        };
        if let Some(parent) = parent {
            self.check_attach(parent, child, true)?;
        }

        if let Some(current) = current {
            self.remove_child(current, child);
        }
        if let Some(parent) = parent {
            match index {
                Some(index) => self.insert_child(parent, child, index)?,
                None => self.add_child(parent, child)?,
            }
        }
        Ok(())
    }

    /// Moves `child` under `parent` while keeping its world position and
    /// rotation. World scale is not preserved.
    pub fn add_child_and_save_transform(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.check_attach(parent, child, true)?;

        let world_position = self.position(child).unwrap_or(Vec3::ZERO);
        let world_rotation = self.rotation(child).unwrap_or(Quat::IDENTITY);

        if let Some(current) = self.nodes.get(child).and_then(|n| n.parent) {
            self.remove_child(current, child);
        }

        let parent_world = self.world_transform(parent).unwrap_or_default();
        let parent_rotation = self.rotation(parent).unwrap_or(Quat::IDENTITY);
        let inv_parent = arbor_core::math::invert_or_identity(&parent_world);

        self.set_local_position(child, inv_parent.transform_point3(world_position));
        self.set_local_rotation(child, parent_rotation.inverse() * world_rotation);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        self.on_insert_child(parent, child);
        Ok(())
    }

    /// Removes `handle` from the graph and the sync queue.
    ///
    /// The node is detached from its parent. Its children are not destroyed;
    /// they are detached and become roots, and the caller decides their fate.
    pub fn destroy(&mut self, handle: NodeHandle) -> Option<GraphNode> {
        let node = self.nodes.get_mut(handle)?;
        let parent = node.parent;
        let children = std::mem::take(&mut node.children);

        if let Some(parent) = parent {
            self.remove_child(parent, handle);
        }
        for child in children {
            self.on_detach(child);
        }
        self.queue.erase(handle);
        self.nodes.remove(handle)
    }

    /// Creates an unparented copy of `handle` with the same name, tags,
    /// labels, local transform, `enabled` and `scale_compensation`.
    /// Children are not copied.
    pub fn clone_node(&mut self, handle: NodeHandle) -> Option<NodeHandle> {
        let source = self.nodes.get(handle)?;
        let mut copy = GraphNode::new(&source.name);
        copy.tags.clone_from(&source.tags);
        copy.labels.clone_from(&source.labels);
        copy.local_position = source.local_position;
        copy.local_rotation = source.local_rotation;
        copy.local_scale = source.local_scale;
        copy.enabled = source.enabled;
        copy.enabled_in_hierarchy = source.enabled;
        copy.scale_compensation = source.scale_compensation;

        let clone = self.nodes.insert(copy);
        self.dirtify_local(clone);
        Some(clone)
    }

    /// Validates an attach of `child` under `parent` without mutating.
    fn check_attach(&self, parent: NodeHandle, child: NodeHandle, allow_parented: bool) -> Result<()> {
        let Some(child_node) = self.nodes.get(child) else {
            return Err(ArborError::InvalidHandle(format!("{child:?}")));
        };
        if !self.nodes.contains_key(parent) {
            return Err(ArborError::InvalidHandle(format!("{parent:?}")));
        }
        if parent == child {
            return Err(ArborError::SelfParent(child_node.name.clone()));
        }
        if !allow_parented && child_node.parent.is_some() {
            return Err(ArborError::AlreadyParented(child_node.name.clone()));
        }
        if self.is_descendant_of(parent, child) {
            return Err(ArborError::CycleDetected {
                child: child_node.name.clone(),
                parent: self.name_of(parent),
            });
        }
        Ok(())
    }

    fn on_insert_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        let parent_enabled = self.nodes.get(parent).is_some_and(GraphNode::enabled);
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        node.parent = Some(parent);

        // Enabled in the hierarchy only if itself and the new parent are.
        let enabled_in_hierarchy = node.enabled && parent_enabled;
        if node.enabled_in_hierarchy != enabled_in_hierarchy {
            self.notify_hierarchy_state_changed(child, enabled_in_hierarchy);
        }

        self.update_graph_depth(child);
        self.dirtify_world(child);
    }

    fn on_detach(&mut self, child: NodeHandle) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        node.parent = None;

        let enabled_in_hierarchy = node.enabled;
        if node.enabled_in_hierarchy != enabled_in_hierarchy {
            self.notify_hierarchy_state_changed(child, enabled_in_hierarchy);
        }

        self.update_graph_depth(child);
        self.dirtify_world(child);
    }

    /// Recomputes `graph_depth` for `handle` and its subtree. Pending queue
    /// entries are re-keyed to the new depth.
    fn update_graph_depth(&mut self, handle: NodeHandle) {
        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        stack.push(handle);

        while let Some(h) = stack.pop() {
            let depth = self
                .nodes
                .get(h)
                .and_then(|n| n.parent)
                .and_then(|p| self.nodes.get(p))
                .map_or(0, |p| p.graph_depth + 1);

            let Some(node) = self.nodes.get_mut(h) else {
                continue;
            };
            if node.graph_depth != depth {
                node.graph_depth = depth;
                if self.queue.contains(h) {
                    self.queue.push(depth, h);
                }
            }
            stack.extend(node.children.iter().copied());
        }
    }

    // ========================================================================
    // Enabled State
    // ========================================================================

    /// Effective enabled state of `handle`; false for a stale handle.
    #[must_use]
    pub fn enabled(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(GraphNode::enabled)
    }

    /// Sets the node's own toggle.
    ///
    /// Descendants are notified only when the value changes and the parent
    /// is enabled (or there is no parent). A disabled parent already keeps
    /// the whole subtree disabled, so nothing below can change.
    pub fn set_enabled(&mut self, handle: NodeHandle, enabled: bool) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };
        if node.enabled == enabled {
            return;
        }
        node.enabled = enabled;

        let parent = node.parent;
        let parent_enabled = parent.is_none_or(|p| self.enabled(p));
        if parent_enabled {
            self.notify_hierarchy_state_changed(handle, enabled);
        }
    }

    /// Pushes an effective state down from `handle`, skipping subtrees whose
    /// own toggle is off since their effective state cannot change.
    fn notify_hierarchy_state_changed(&mut self, handle: NodeHandle, enabled: bool) {
        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        stack.push(handle);

        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get_mut(h) else {
                continue;
            };
            node.enabled_in_hierarchy = enabled;

            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            for &child in &node.children {
                if self.nodes.get(child).is_some_and(|c| c.enabled) {
                    stack.push(child);
                }
            }
        }
    }
}
