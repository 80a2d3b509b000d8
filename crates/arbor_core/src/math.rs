//! Matrix helpers that glam does not provide in the form the hierarchy needs.
//!
//! All helpers are pure functions over glam value types. None of them
//! allocate and none of them produce NaN for singular input: a degenerate
//! matrix falls back to identity instead.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Euler order used for every angle conversion in the workspace.
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Inverts `m`, returning identity when the determinant is zero or not finite.
#[inline]
#[must_use]
pub fn invert_or_identity(m: &Mat4) -> Mat4 {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return Mat4::IDENTITY;
    }
    m.inverse()
}

/// World scale encoded in `m`: the lengths of the three basis columns.
#[inline]
#[must_use]
pub fn world_scale(m: &Mat4) -> Vec3 {
    Vec3::new(
        m.x_axis.truncate().length(),
        m.y_axis.truncate().length(),
        m.z_axis.truncate().length(),
    )
}

/// Translation column of `m`.
#[inline]
#[must_use]
pub fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Rotation encoded in `m` with scale removed.
///
/// A matrix with a collapsed axis has no meaningful rotation and yields
/// [`Quat::IDENTITY`]. Mirrored matrices fold the reflection into the X axis.
#[must_use]
pub fn world_rotation(m: &Mat4) -> Quat {
    let mut scale = world_scale(m);
    if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 {
        return Quat::IDENTITY;
    }
    if m.determinant() < 0.0 {
        scale.x = -scale.x;
    }

    let basis = Mat3::from_cols(
        m.x_axis.truncate() / scale.x,
        m.y_axis.truncate() / scale.y,
        m.z_axis.truncate() / scale.z,
    );
    Quat::from_mat3(&basis).normalize()
}

/// Inverse-transpose of the upper 3x3 of `m`, for transforming normals.
#[must_use]
pub fn normal_matrix(m: &Mat4) -> Mat3 {
    let upper = Mat3::from_mat4(*m);
    let det = upper.determinant();
    if det == 0.0 || !det.is_finite() {
        return Mat3::IDENTITY;
    }
    upper.inverse().transpose()
}

/// Builds a rotation from XYZ euler angles in radians.
#[inline]
#[must_use]
pub fn quat_from_euler(angles: Vec3) -> Quat {
    Quat::from_euler(EULER_ORDER, angles.x, angles.y, angles.z)
}

/// Decomposes a rotation into XYZ euler angles in radians.
#[inline]
#[must_use]
pub fn euler_from_quat(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}

/// Rotation that points the local -Z axis from `eye` towards `target`.
///
/// Returns `None` when `eye == target` or when `up` is parallel to the view
/// direction, since no unique basis exists in either case.
#[must_use]
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let z = eye - target;
    if z.length_squared() < 1e-12 {
        return None;
    }
    let z = z.normalize();

    let x = up.cross(z);
    if x.length_squared() < 1e-8 {
        return None;
    }
    let x = x.normalize();
    let y = z.cross(x);

    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn singular_inverse_is_identity() {
        let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(invert_or_identity(&m), Mat4::IDENTITY);
    }

    #[test]
    fn regular_inverse_round_trips() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.4),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let p = Vec3::new(-4.0, 0.5, 9.0);
        let back = invert_or_identity(&m).transform_point3(m.transform_point3(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn rotation_ignores_scale() {
        let q = Quat::from_rotation_z(FRAC_PI_2);
        let m = Mat4::from_scale_rotation_translation(Vec3::new(3.0, 0.5, 2.0), q, Vec3::ZERO);
        assert!(world_rotation(&m).angle_between(q) < 1e-4);
        assert!((world_scale(&m) - Vec3::new(3.0, 0.5, 2.0)).length() < EPSILON);
    }

    #[test]
    fn collapsed_axis_has_identity_rotation() {
        let m = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(world_rotation(&m), Quat::IDENTITY);
    }

    #[test]
    fn look_rotation_faces_target() {
        let q = look_rotation(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::Y).unwrap();
        let forward = q * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn look_rotation_rejects_parallel_up() {
        assert!(look_rotation(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y).is_none());
        assert!(look_rotation(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
    }

    #[test]
    fn euler_round_trip() {
        let angles = Vec3::new(0.3, 0.7, 1.2);
        let back = euler_from_quat(quat_from_euler(angles));
        assert!((back - angles).length() < 1e-4);
    }
}
