//! Curve Tests
//!
//! Tests for:
//! - Key ordering and insertion
//! - Value clamping outside the key range
//! - Linear / SmoothStep / CatmullRom / Cardinal interpolation
//! - closest-key lookup
//! - Quantization of curves and curve sets

use arbor::{Curve, CurveSet, CurveType};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn linear(keys: &[(f32, f32)]) -> Curve {
    let mut curve = Curve::new(keys.iter().copied());
    curve.curve_type = CurveType::Linear;
    curve
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn new_sorts_keys_by_time() {
    let curve = Curve::new([(1.0, 10.0), (0.0, 0.0), (0.5, 3.0)]);
    assert_eq!(curve.len(), 3);
    assert_eq!(curve.get(0), Some((0.0, 0.0)));
    assert_eq!(curve.get(1), Some((0.5, 3.0)));
    assert_eq!(curve.get(2), Some((1.0, 10.0)));
    assert_eq!(curve.get(3), None);
    assert_eq!(curve.curve_type, CurveType::SmoothStep);
    assert!(approx(curve.tension, 0.5));
}

#[test]
fn add_inserts_after_equal_times() {
    let mut curve = Curve::new([(0.0, 0.0), (1.0, 1.0)]);
    curve.add(1.0, 5.0);
    curve.add(0.5, 2.0);
    assert_eq!(curve.keys(), &[(0.0, 0.0), (0.5, 2.0), (1.0, 1.0), (1.0, 5.0)]);
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn empty_curve_is_zero() {
    let curve = Curve::default();
    assert!(curve.is_empty());
    assert_eq!(curve.value(0.3), 0.0);
}

#[test]
fn value_holds_end_keys_outside_range() {
    let curve = linear(&[(0.2, 4.0), (0.8, 8.0)]);
    assert_eq!(curve.value(0.0), 4.0);
    assert_eq!(curve.value(1.0), 8.0);
    assert_eq!(curve.value(0.8), 8.0);
}

#[test]
fn linear_interpolates_between_neighbours() {
    let curve = linear(&[(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)]);
    assert!(approx(curve.value(0.25), 2.5));
    assert!(approx(curve.value(1.5), 20.0));
    assert_eq!(curve.value(1.0), 10.0);
}

#[test]
fn smoothstep_eases_in_and_out() {
    let curve = Curve::new([(0.0, 0.0), (1.0, 1.0)]);
    assert!(approx(curve.value(0.5), 0.5));
    assert!(approx(curve.value(0.25), 0.15625));
    assert!(approx(curve.value(0.75), 0.84375));
}

#[test]
fn catmull_rom_is_linear_on_evenly_spaced_line() {
    let mut curve = Curve::new([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    curve.curve_type = CurveType::CatmullRom;
    assert!(approx(curve.value(1.5), 1.5));
    assert!(approx(curve.value(0.25), 0.25));
    assert!(approx(curve.value(2.75), 2.75));
}

#[test]
fn cardinal_with_zero_tension_is_flat_at_keys() {
    let mut curve = Curve::new([(0.0, 0.0), (1.0, 1.0)]);
    curve.curve_type = CurveType::Cardinal;
    curve.tension = 0.0;
    // Zero tangents reduce the Hermite basis to smoothstep.
    assert!(approx(curve.value(0.25), 0.15625));

    curve.tension = 0.5;
    curve.curve_type = CurveType::CatmullRom;
    let catmull = curve.value(0.3);
    curve.curve_type = CurveType::Cardinal;
    assert!(approx(curve.value(0.3), catmull));
}

#[test]
fn closest_stops_once_distance_grows() {
    let curve = Curve::new([(0.0, 1.0), (0.4, 2.0), (0.9, 3.0)]);
    assert_eq!(curve.closest(0.5), Some((0.4, 2.0)));
    assert_eq!(curve.closest(1.0), Some((0.9, 3.0)));
    assert_eq!(curve.closest(5.0), None);
    assert_eq!(Curve::default().closest(0.0), None);
}

#[test]
fn quantize_samples_unit_interval() {
    let curve = linear(&[(0.0, 0.0), (1.0, 4.0)]);
    let table = curve.quantize(5);
    assert_eq!(table.len(), 5);
    for (sample, expected) in table.iter().zip([0.0, 1.0, 2.0, 3.0, 4.0]) {
        assert!(approx(*sample, expected));
    }
    assert_eq!(curve.quantize(0).len(), 2);
}

// ============================================================================
// CurveSet
// ============================================================================

#[test]
fn curve_set_applies_type_to_every_curve() {
    let mut set = CurveSet::new(vec![
        Curve::new([(0.0, 0.0), (1.0, 1.0)]),
        Curve::new([(0.0, 10.0), (1.0, 0.0)]),
    ]);
    assert_eq!(set.curve_type(), CurveType::SmoothStep);

    set.set_curve_type(CurveType::Linear);
    assert!(set.get(0).is_some_and(|c| c.curve_type == CurveType::Linear));
    assert!(set.get(1).is_some_and(|c| c.curve_type == CurveType::Linear));

    let mut out = vec![99.0; 7];
    set.value(0.25, &mut out);
    assert_eq!(out.len(), 2);
    assert!(approx(out[0], 0.25));
    assert!(approx(out[1], 7.5));
}

#[test]
fn curve_set_quantize_interleaves_curves() {
    let mut set = CurveSet::with_len(2);
    assert_eq!(set.len(), 2);
    set.get_mut(0).unwrap().add(0.0, 0.0);
    set.get_mut(0).unwrap().add(1.0, 2.0);
    set.get_mut(1).unwrap().add(0.0, 5.0);
    set.set_curve_type(CurveType::Linear);

    let table = set.quantize(3);
    let expected = [0.0, 5.0, 1.0, 5.0, 2.0, 5.0];
    assert_eq!(table.len(), expected.len());
    for (sample, expected) in table.iter().zip(expected) {
        assert!(approx(*sample, expected));
    }
}
