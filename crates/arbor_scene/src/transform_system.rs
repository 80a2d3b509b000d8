//! Transform System
//!
//! Dirty-flag protocol and world-matrix resolution for the scene graph.
//!
//! # Invalidation
//!
//! - [`SceneGraph::dirtify_local`] marks the local matrix stale and, if the
//!   node was world-clean, cascades into world invalidation.
//! - World invalidation enqueues the node into the [`SyncQueue`] at its graph
//!   depth, bumps its `aabb_version` and walks the subtree, stopping at any
//!   node that is already world-dirty (everything below it is already
//!   pending).
//!
//! # Resolution
//!
//! Resolution is lazy. [`SceneGraph::world_transform`] returns the cached
//! matrix when the node is clean; otherwise it collects the dirty ancestor
//! chain and syncs it root-down. [`SceneGraph::sync`] drains the queue in
//! depth order so that, when the host flushes once per frame, each node is
//! recomputed exactly once.
//!
//! # Scale Compensation
//!
//! A node with `scale_compensation` does not inherit its immediate parent's
//! scale. Its world matrix is rebuilt from parts:
//! - scale: world scale of the parent of the first non-compensating
//!   ancestor times the node's local scale, or the local scale alone when
//!   that ancestor is a root;
//! - rotation: the immediate parent's world rotation times the local
//!   rotation;
//! - translation: the local position transformed by the parent's world
//!   matrix, or, when the parent itself compensates, by a matrix built from
//!   the parent's world translation and rotation and a scale of
//!   (that ancestor's world scale × the parent's local scale).

use arbor_core::math;
use glam::{Mat3, Mat4, Vec3};
use smallvec::SmallVec;

use crate::graph::SceneGraph;
use crate::node::GraphNode;
use crate::sync_queue::SyncQueue;
use crate::NodeHandle;

impl<Q: SyncQueue> SceneGraph<Q> {
    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Marks the local matrix of `handle` stale.
    pub fn dirtify_local(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };
        if node.dirty_local {
            return;
        }
        node.dirty_local = true;
        if !node.dirty_world {
            self.dirtify_world(handle);
        }
    }

    /// Marks the world matrix of `handle` and of its whole subtree stale and
    /// enqueues every newly dirtied node.
    pub(crate) fn dirtify_world(&mut self, handle: NodeHandle) {
        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        stack.push(handle);

        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get_mut(h) else {
                continue;
            };
            if node.dirty_world {
                continue;
            }
            node.dirty_world = true;
            node.dirty_normal = true;
            node.aabb_version = node.aabb_version.wrapping_add(1);
            self.queue.push(node.graph_depth, h);

            stack.extend(node.children.iter().copied());
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Local matrix of `handle`, recomposed from TRS if stale.
    pub fn local_transform(&mut self, handle: NodeHandle) -> Option<Mat4> {
        let node = self.nodes.get_mut(handle)?;
        if node.dirty_local {
            node.local_transform = Mat4::from_scale_rotation_translation(
                node.local_scale,
                node.local_rotation,
                node.local_position,
            );
            node.dirty_local = false;
        }
        Some(node.local_transform)
    }

    /// World matrix of `handle`.
    ///
    /// O(1) for a clean node. A dirty node first resolves its dirty ancestors
    /// root-down, then itself.
    pub fn world_transform(&mut self, handle: NodeHandle) -> Option<Mat4> {
        let node = self.nodes.get(handle)?;
        if node.dirty_local || node.dirty_world {
            self.resolve(handle);
        }
        self.nodes.get(handle).map(|n| n.world_transform)
    }

    /// Inverse-transpose of the world matrix's upper 3x3, cached until the
    /// next world invalidation.
    pub fn normal_matrix(&mut self, handle: NodeHandle) -> Option<Mat3> {
        let world = self.world_transform(handle)?;
        let node = self.nodes.get_mut(handle)?;
        if node.dirty_normal {
            node.normal_matrix = math::normal_matrix(&world);
            node.dirty_normal = false;
        }
        Some(node.normal_matrix)
    }

    /// Drains the sync queue in depth order, resolving every pending node.
    ///
    /// Returns the number of nodes whose matrices were recomputed. Entries
    /// for nodes that were resolved on demand in the meantime, or destroyed,
    /// are skipped.
    pub fn sync(&mut self) -> usize {
        let mut resolved = 0;
        while let Some(handle) = self.queue.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.dirty_local || node.dirty_world {
                self.resolve(handle);
                resolved += 1;
            }
        }
        log::trace!("Sync queue drained: {resolved} node(s) resolved");
        resolved
    }

    /// Eagerly resolves `handle` and its enabled descendants, parents first.
    /// Subtrees whose own toggle is off are skipped.
    pub fn sync_hierarchy(&mut self, handle: NodeHandle) {
        if !self.nodes.get(handle).is_some_and(|n| n.enabled) {
            return;
        }
        self.resolve(handle);

        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        if let Some(node) = self.nodes.get(handle) {
            stack.extend(node.children.iter().rev().copied());
        }
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            if !node.enabled {
                continue;
            }
            if node.dirty_local || node.dirty_world {
                self.sync_node(h);
            }
            if let Some(node) = self.nodes.get(h) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    /// Syncs the dirty part of `handle`'s ancestor chain, root-down.
    fn resolve(&mut self, handle: NodeHandle) {
        // A clean node implies a clean ancestor chain, so the walk stops at
        // the first clean ancestor.
        let mut chain: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        let mut cursor = Some(handle);
        while let Some(h) = cursor {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            if !node.dirty_local && !node.dirty_world {
                break;
            }
            chain.push(h);
            cursor = node.parent;
        }

        for &h in chain.iter().rev() {
            self.sync_node(h);
        }
    }

    /// Recomputes the stale matrices of a single node. The parent's world
    /// matrix must already be current.
    pub(crate) fn sync_node(&mut self, handle: NodeHandle) {
        self.local_transform(handle);

        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        if !node.dirty_world {
            return;
        }

        let world = match node.parent.and_then(|p| self.nodes.get(p)) {
            None => node.local_transform,
            Some(parent) if !node.scale_compensation => parent.world_transform * node.local_transform,
            Some(parent) => self.compensated_world(node, parent),
        };

        self.sync_stamp += 1;
        let stamp = self.sync_stamp;
        if let Some(node) = self.nodes.get_mut(handle) {
            node.world_transform = world;
            node.world_version = stamp;
            node.dirty_world = false;
        }
    }

    fn compensated_world(&self, node: &GraphNode, parent: &GraphNode) -> Mat4 {
        // Skip the compensating ancestors, then step past the first one that
        // does not compensate: its own scale is the one being cancelled.
        let mut source = Some(parent);
        while let Some(ancestor) = source {
            if !ancestor.scale_compensation {
                break;
            }
            source = ancestor.parent.and_then(|p| self.nodes.get(p));
        }
        let source = source.and_then(|s| s.parent).and_then(|p| self.nodes.get(p));
        let source_scale = source.map(|s| math::world_scale(&s.world_transform));

        let scale = source_scale.map_or(node.local_scale, |s| s * node.local_scale);

        let parent_rotation = math::world_rotation(&parent.world_transform);
        let rotation = parent_rotation * node.local_rotation;

        let position = if parent.scale_compensation {
            let parent_scale = source_scale.unwrap_or(Vec3::ONE) * parent.local_scale;
            Mat4::from_scale_rotation_translation(
                parent_scale,
                parent_rotation,
                math::translation(&parent.world_transform),
            )
            .transform_point3(node.local_position)
        } else {
            parent.world_transform.transform_point3(node.local_position)
        };

        Mat4::from_scale_rotation_translation(scale, rotation, position)
    }
}
