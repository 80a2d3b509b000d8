//! # Arbor
//!
//! A transform hierarchy with lazily resolved world matrices, driven by
//! skeletal keyframe animation.
//!
//! - [`scene`]: [`SceneGraph`] arena of [`GraphNode`]s, dirty-flag
//!   invalidation and the depth-ordered [`SyncQueue`]
//! - [`animation`]: [`Animation`] clip data, [`Skeleton`] evaluation and
//!   blending, scalar [`Curve`]s
//! - [`core`]: [`ArborError`] and glam helpers
//!
//! ```
//! use std::sync::Arc;
//! use arbor::{Animation, Key, Node, SceneGraph, Skeleton};
//! use glam::Vec3;
//!
//! let mut graph = SceneGraph::default();
//! let root = graph.create_node("root");
//! let arm = graph.create_node("arm");
//! graph.add_child(root, arm).unwrap();
//!
//! let clip = Animation::new("wave", 1.0).with_node(Node::with_keys(
//!     "arm",
//!     vec![Key::from_position(0.0, Vec3::ZERO), Key::from_position(1.0, Vec3::Y)],
//! ));
//!
//! let mut skeleton = Skeleton::new(&graph, root);
//! skeleton.set_graph(&graph, Some(root));
//! skeleton.set_animation(Some(Arc::new(clip)));
//! skeleton.add_time(0.5);
//! skeleton.update_graph(&mut graph);
//!
//! let position = graph.position(arm).unwrap();
//! assert!((position.y - 0.5).abs() < 1e-5);
//! ```

pub use arbor_animation as animation;
pub use arbor_core as core;
pub use arbor_scene as scene;

pub use glam;

pub use arbor_animation::{
    Animation, Curve, CurveSet, CurveType, InterpolatedKey, Key, Node, Skeleton, SkeletonSettings,
};
pub use arbor_core::{ArborError, Result};
pub use arbor_scene::{DepthSyncQueue, GraphNode, GraphSettings, NodeHandle, SceneGraph, SyncQueue};
