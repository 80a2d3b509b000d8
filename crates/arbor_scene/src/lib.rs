//! Transform hierarchy module
//!
//! Manages the spatial node tree and its lazily resolved world matrices:
//! - [`GraphNode`]: per-node local TRS, cached matrices and dirty flags
//! - [`SceneGraph`]: arena owning the nodes, hierarchy mutation and resolution
//! - [`SyncQueue`]: depth-ordered pending set of nodes awaiting a world resolve
//! - [`DepthSyncQueue`]: the default bucketed [`SyncQueue`]

pub mod graph;
pub mod node;
pub mod query;
pub mod sync_queue;
pub mod transform;
pub mod transform_system;

pub use graph::{GraphSettings, SceneGraph};
pub use node::GraphNode;
pub use sync_queue::{DepthSyncQueue, SyncQueue};

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle to a [`GraphNode`] inside a [`SceneGraph`].
    ///
    /// Handles never keep a node alive. A handle to a destroyed node is
    /// simply stale and every lookup through it yields `None`.
    pub struct NodeHandle;
}
