//! Keyframe animation module
//!
//! Drives a [`SceneGraph`](arbor_scene::SceneGraph) hierarchy from sampled
//! keyframe data:
//! - [`Key`], [`Node`], [`Animation`]: immutable clip data, one channel per
//!   target node name
//! - [`Skeleton`]: play-head, per-channel cursor search, pose blending and the
//!   explicit commit into the graph
//! - [`InterpolatedKey`]: per-node pose slot of a skeleton
//! - [`Curve`], [`CurveSet`]: scalar time/value curves

pub mod animation;
pub mod curve;
pub mod interpolated_key;
pub mod key;
pub mod node;
pub mod skeleton;

pub use animation::Animation;
pub use curve::{Curve, CurveSet, CurveType};
pub use interpolated_key::InterpolatedKey;
pub use key::Key;
pub use node::Node;
pub use skeleton::{Skeleton, SkeletonSettings};
