//! Transform resolution tests
//!
//! Tests for:
//! - Lazy world resolve and idempotency
//! - Dirty propagation and the sync queue
//! - Depth-ordered draining
//! - World setters round-tripping through a parent
//! - Incremental mutators and world-space readers

use arbor::core::math;
use arbor::{SceneGraph, SyncQueue};
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn quat_approx(a: Quat, b: Quat) -> bool {
    a.angle_between(b) < 1e-3
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn world_transform_is_idempotent() {
    let mut graph = SceneGraph::default();
    let root = graph.create_node("root");
    let child = graph.create_node("child");
    graph.add_child(root, child).unwrap();
    graph.set_local_position(root, Vec3::new(1.0, 2.0, 3.0));
    graph.set_local_position(child, Vec3::X);

    let first = graph.world_transform(child).unwrap();
    let version = graph.get(child).unwrap().world_version();
    assert!(!graph.get(child).unwrap().is_dirty_world());

    let second = graph.world_transform(child).unwrap();
    assert_eq!(first, second);
    assert_eq!(graph.get(child).unwrap().world_version(), version);
    assert!(vec3_approx(math::translation(&second), Vec3::new(2.0, 2.0, 3.0)));
}

#[test]
fn root_world_equals_local() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    graph.set_local_trs(node, Vec3::new(4.0, 5.0, 6.0), Quat::from_rotation_x(0.3), Vec3::splat(2.0));

    let local = graph.local_transform(node).unwrap();
    assert_eq!(graph.world_transform(node).unwrap(), local);
}

#[test]
fn dirty_propagates_to_every_descendant() {
    let mut graph = SceneGraph::default();
    let root = graph.create_node("root");
    let a = graph.create_node("a");
    let b = graph.create_node("b");
    graph.add_child(root, a).unwrap();
    graph.add_child(a, b).unwrap();
    graph.sync();
    assert!(graph.queue().is_empty());

    let b_version = graph.get(b).unwrap().aabb_version();
    graph.set_local_position(root, Vec3::Y);

    for handle in [root, a, b] {
        assert!(graph.get(handle).unwrap().is_dirty_world());
        assert!(graph.queue().contains(handle));
    }
    assert!(!graph.get(a).unwrap().is_dirty_local());
    assert_eq!(graph.get(b).unwrap().aabb_version(), b_version + 1);

    // Reading the leaf resolves its whole chain.
    assert!(vec3_approx(graph.position(b).unwrap(), Vec3::Y));
    assert!(!graph.get(root).unwrap().is_dirty_world());
    assert!(!graph.get(a).unwrap().is_dirty_world());
}

#[test]
fn sync_drains_parents_before_children() {
    let mut graph = SceneGraph::default();
    let a = graph.create_node("a");
    let b = graph.create_node("b");
    let c = graph.create_node("c");
    graph.add_child(a, b).unwrap();
    graph.add_child(b, c).unwrap();
    graph.set_local_position(a, Vec3::X);

    assert_eq!(graph.sync(), 3);
    assert!(graph.queue().is_empty());

    let version = |h| graph.get(h).unwrap().world_version();
    assert!(version(a) < version(b));
    assert!(version(b) < version(c));
}

#[test]
fn sync_skips_nodes_resolved_on_demand() {
    let mut graph = SceneGraph::default();
    let a = graph.create_node("a");
    let b = graph.create_node("b");
    graph.add_child(a, b).unwrap();

    graph.world_transform(b).unwrap();
    assert_eq!(graph.sync(), 0);
}

#[test]
fn detached_node_keeps_only_its_local_transform() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_position(parent, Vec3::new(10.0, 0.0, 0.0));
    graph.set_local_position(child, Vec3::Y);
    assert!(vec3_approx(graph.position(child).unwrap(), Vec3::new(10.0, 1.0, 0.0)));

    assert!(graph.remove_child(parent, child));
    assert!(vec3_approx(graph.position(child).unwrap(), Vec3::Y));
}

// ============================================================================
// World Setters
// ============================================================================

#[test]
fn set_position_round_trips_without_parent() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    let p = Vec3::new(-3.0, 7.5, 0.25);

    graph.set_position(node, p);
    assert!(vec3_approx(graph.position(node).unwrap(), p));
    assert_eq!(graph.get(node).unwrap().local_position(), p);
}

#[test]
fn set_position_round_trips_through_parent() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_trs(
        parent,
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_rotation_y(FRAC_PI_2),
        Vec3::splat(2.0),
    );

    let p = Vec3::new(5.0, -1.0, 4.0);
    graph.set_position(child, p);
    assert!(vec3_approx(graph.position(child).unwrap(), p));
}

#[test]
fn set_rotation_round_trips_through_parent() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_rotation(parent, Quat::from_rotation_z(0.8));

    let q = Quat::from_rotation_x(0.4) * Quat::from_rotation_y(-1.1);
    graph.set_rotation(child, q);
    assert!(quat_approx(graph.rotation(child).unwrap(), q));
}

#[test]
fn euler_angles_round_trip() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    let angles = Vec3::new(0.1, 0.2, 0.3);

    graph.set_local_euler_angles(node, angles);
    assert!(vec3_approx(graph.local_euler_angles(node).unwrap(), angles));

    graph.set_euler_angles(node, angles);
    assert!(vec3_approx(graph.euler_angles(node).unwrap(), angles));
}

// ============================================================================
// Incremental Mutators
// ============================================================================

#[test]
fn translate_moves_in_world_space() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_rotation(parent, Quat::from_rotation_y(FRAC_PI_2));

    graph.translate(child, Vec3::X);
    assert!(vec3_approx(graph.position(child).unwrap(), Vec3::X));
}

#[test]
fn translate_local_follows_own_axes() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    graph.set_local_rotation(node, Quat::from_rotation_y(FRAC_PI_2));

    graph.translate_local(node, Vec3::X);
    assert!(vec3_approx(graph.get(node).unwrap().local_position(), Vec3::NEG_Z));
}

#[test]
fn rotate_applies_world_delta_under_rotated_parent() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_rotation(parent, Quat::from_rotation_y(FRAC_PI_2));

    graph.rotate(child, Vec3::new(0.0, FRAC_PI_2, 0.0));
    assert!(quat_approx(graph.rotation(child).unwrap(), Quat::from_rotation_y(PI)));
}

#[test]
fn rotate_local_post_multiplies() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    graph.set_local_rotation(node, Quat::from_rotation_x(FRAC_PI_2));

    graph.rotate_local(node, Vec3::new(0.0, 0.0, FRAC_PI_2));
    let expected = Quat::from_rotation_x(FRAC_PI_2) * Quat::from_rotation_z(FRAC_PI_2);
    assert!(quat_approx(graph.get(node).unwrap().local_rotation(), expected));
}

#[test]
fn look_at_points_forward_at_target() {
    let mut graph = SceneGraph::default();
    let node = graph.create_node("node");
    graph.set_local_position(node, Vec3::new(0.0, 0.0, 5.0));

    graph.look_at(node, Vec3::new(5.0, 0.0, 5.0), Vec3::Y);
    assert!(vec3_approx(graph.forward(node).unwrap(), Vec3::X));
    assert!(vec3_approx(graph.up(node).unwrap(), Vec3::Y));
    assert!(vec3_approx(graph.right(node).unwrap(), Vec3::Z));
}

#[test]
fn world_scale_multiplies_down_the_chain() {
    let mut graph = SceneGraph::default();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add_child(parent, child).unwrap();
    graph.set_local_scale(parent, Vec3::splat(2.0));
    graph.set_local_scale(child, Vec3::new(1.0, 3.0, 1.0));

    assert!(vec3_approx(graph.scale(child).unwrap(), Vec3::new(2.0, 6.0, 2.0)));
}

#[test]
fn sync_hierarchy_skips_disabled_subtrees() {
    let mut graph = SceneGraph::default();
    let root = graph.create_node("root");
    let on = graph.create_node("on");
    let off = graph.create_node("off");
    graph.add_child(root, on).unwrap();
    graph.add_child(root, off).unwrap();
    graph.set_enabled(off, false);
    graph.set_local_position(root, Vec3::X);

    graph.sync_hierarchy(root);
    assert!(!graph.get(on).unwrap().is_dirty_world());
    assert!(graph.get(off).unwrap().is_dirty_world());
    assert_eq!(
        *graph.get(on).unwrap().cached_world_transform(),
        Mat4::from_translation(Vec3::X)
    );
}
