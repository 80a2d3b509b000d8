//! Sync queue
//!
//! A deferred-work set of nodes whose world matrix is stale. The graph pushes
//! a node the moment it becomes world-dirty and the host drains the queue
//! (usually once per frame, before rendering) through [`SceneGraph::sync`].
//!
//! Draining must yield nodes in non-decreasing graph depth so that a parent
//! is always resolved before its children consume its world matrix.
//! Correctness does not depend on it: [`SceneGraph::world_transform`]
//! resolves the ancestor chain on demand. Only the amount of redundant
//! walking does.
//!
//! [`SceneGraph::sync`]: crate::SceneGraph::sync
//! [`SceneGraph::world_transform`]: crate::SceneGraph::world_transform

use slotmap::SecondaryMap;

use crate::NodeHandle;

/// Depth-ordered pending set consumed by [`SceneGraph`](crate::SceneGraph).
///
/// Implementations are owned by the host and injected at graph construction.
pub trait SyncQueue {
    /// Enqueues `node` at `depth`. Pushing a node that is already pending
    /// moves it to the new depth.
    fn push(&mut self, depth: u32, node: NodeHandle);

    /// Removes a pending entry. Unknown nodes are ignored.
    fn erase(&mut self, node: NodeHandle);

    /// Removes and returns a pending node of the lowest depth.
    fn pop(&mut self) -> Option<NodeHandle>;

    /// Returns true if `node` is pending.
    fn contains(&self, node: NodeHandle) -> bool;

    /// Number of pending nodes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucketed [`SyncQueue`]: one bucket per graph depth.
///
/// `push`, `pop` and `contains` are O(1) amortised; `erase` is linear in the
/// size of a single depth bucket.
#[derive(Debug, Default, Clone)]
pub struct DepthSyncQueue {
    buckets: Vec<Vec<NodeHandle>>,
    pending: SecondaryMap<NodeHandle, u32>,
    /// No bucket below this index holds an entry.
    lowest: usize,
}

impl DepthSyncQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth at which `node` is pending, if it is.
    #[must_use]
    pub fn depth_of(&self, node: NodeHandle) -> Option<u32> {
        self.pending.get(node).copied()
    }

    /// Drops every pending entry, keeping bucket allocations for reuse.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.pending.clear();
        self.lowest = 0;
    }

    fn remove_from_bucket(&mut self, depth: u32, node: NodeHandle) {
        if let Some(bucket) = self.buckets.get_mut(depth as usize)
            && let Some(pos) = bucket.iter().position(|&h| h == node)
        {
            bucket.swap_remove(pos);
        }
    }
}

impl SyncQueue for DepthSyncQueue {
    fn push(&mut self, depth: u32, node: NodeHandle) {
        if let Some(&current) = self.pending.get(node) {
            if current == depth {
                return;
            }
            self.remove_from_bucket(current, node);
        }

        let index = depth as usize;
        if self.buckets.len() <= index {
            self.buckets.resize_with(index + 1, Vec::new);
        }
        self.buckets[index].push(node);
        self.pending.insert(node, depth);
        self.lowest = self.lowest.min(index);
    }

    fn erase(&mut self, node: NodeHandle) {
        if let Some(depth) = self.pending.remove(node) {
            self.remove_from_bucket(depth, node);
        }
    }

    fn pop(&mut self) -> Option<NodeHandle> {
        while let Some(bucket) = self.buckets.get_mut(self.lowest) {
            if let Some(node) = bucket.pop() {
                self.pending.remove(node);
                return Some(node);
            }
            self.lowest += 1;
        }
        // Fully drained: restart the scan from the root bucket next time.
        self.lowest = 0;
        None
    }

    fn contains(&self, node: NodeHandle) -> bool {
        self.pending.contains_key(node)
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}
