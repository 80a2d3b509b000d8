//! Hierarchy queries.
//!
//! Every search is depth-first, pre-order, visiting children in list order.
//! Searches take a typed predicate over [`GraphNode`]; attribute lookups
//! such as "by name" are thin closures over that predicate.

use smallvec::SmallVec;

use crate::graph::SceneGraph;
use crate::node::GraphNode;
use crate::sync_queue::SyncQueue;
use crate::NodeHandle;

impl<Q: SyncQueue> SceneGraph<Q> {
    /// Visits `handle` and every descendant, parents before children.
    pub fn for_each(&self, handle: NodeHandle, mut visit: impl FnMut(NodeHandle, &GraphNode)) {
        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        stack.push(handle);

        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            visit(h, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// All nodes in the subtree rooted at `handle` (itself included) that
    /// satisfy `predicate`.
    pub fn find(&self, handle: NodeHandle, mut predicate: impl FnMut(&GraphNode) -> bool) -> Vec<NodeHandle> {
        let mut results = Vec::new();
        self.for_each(handle, |h, node| {
            if predicate(node) {
                results.push(h);
            }
        });
        results
    }

    /// First node in the subtree rooted at `handle` (itself included) that
    /// satisfies `predicate`.
    pub fn find_one(&self, handle: NodeHandle, mut predicate: impl FnMut(&GraphNode) -> bool) -> Option<NodeHandle> {
        let mut stack: SmallVec<[NodeHandle; 16]> = SmallVec::new();
        stack.push(handle);

        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            if predicate(node) {
                return Some(h);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    #[must_use]
    pub fn find_by_name(&self, handle: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.find_one(handle, |node| node.name == name)
    }

    /// Resolves a slash-delimited path one segment at a time against the
    /// immediate children of the current node.
    ///
    /// `"arm/hand"` finds a child named `arm` of `handle`, then a child
    /// named `hand` of that node. Returns `None` as soon as a segment has no
    /// matching child.
    #[must_use]
    pub fn find_by_path(&self, handle: NodeHandle, path: &str) -> Option<NodeHandle> {
        let mut current = handle;
        for segment in path.split('/') {
            let node = self.nodes.get(current)?;
            current = node
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes.get(c).is_some_and(|n| n.name == segment))?;
        }
        Some(current)
    }

    /// Descendants of `handle` carrying `tag`. The node itself is not tested.
    #[must_use]
    pub fn find_by_tag(&self, handle: NodeHandle, tag: &str) -> Vec<NodeHandle> {
        let mut results = Vec::new();
        self.for_each(handle, |h, node| {
            if h != handle && node.has_tag(tag) {
                results.push(h);
            }
        });
        results
    }

    /// Nodes in the subtree rooted at `handle` (itself included) carrying
    /// `label`.
    #[must_use]
    pub fn find_by_label(&self, handle: NodeHandle, label: &str) -> Vec<NodeHandle> {
        self.find(handle, |node| node.has_label(label))
    }

    // ========================================================================
    // Ancestry
    // ========================================================================

    /// Topmost ancestor of `handle`, or `handle` itself for a root.
    #[must_use]
    pub fn root(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let mut current = handle;
        let mut node = self.nodes.get(current)?;
        while let Some(parent) = node.parent {
            let Some(parent_node) = self.nodes.get(parent) else {
                break;
            };
            current = parent;
            node = parent_node;
        }
        Some(current)
    }

    /// Slash-joined names from just below the root down to `handle`. Empty
    /// for a root; usable with [`find_by_path`](Self::find_by_path) from the
    /// root.
    #[must_use]
    pub fn path(&self, handle: NodeHandle) -> String {
        let mut names: SmallVec<[&str; 16]> = SmallVec::new();
        let mut current = self.nodes.get(handle);
        while let Some(node) = current {
            let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) else {
                break;
            };
            names.push(&node.name);
            current = Some(parent);
        }
        names.reverse();
        names.join("/")
    }

    /// True if `handle` lies strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, handle: NodeHandle, ancestor: NodeHandle) -> bool {
        let mut parent = self.nodes.get(handle).and_then(|n| n.parent);
        while let Some(p) = parent {
            if p == ancestor {
                return true;
            }
            parent = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// True if `descendant` lies strictly below `handle`.
    #[must_use]
    pub fn is_ancestor_of(&self, handle: NodeHandle, descendant: NodeHandle) -> bool {
        self.is_descendant_of(descendant, handle)
    }
}
