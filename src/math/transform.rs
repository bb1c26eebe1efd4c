use glam::{Mat4, Vec3};

pub fn deg_to_rad(angle: f64) -> f64 {
    angle * std::f64::consts::PI / 180.0
}

/// Right-handed perspective projection with a `[0, 1]` depth range.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y, aspect, near, far)
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// Rotation by `angle` radians about `axis`. The axis does not need to be unit length.
pub fn axis_rotation(axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_axis_angle(axis.normalize(), angle)
}

/// `a · b`, so `b` is applied to a vector first.
pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

pub fn inverse(m: Mat4) -> Mat4 {
    m.inverse()
}

pub fn transpose(m: Mat4) -> Mat4 {
    m.transpose()
}

/// Inverse-transpose of `model_view`, used to carry normals into eye space.
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    transpose(inverse(model_view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_deg_to_rad() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((deg_to_rad(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }

    #[test]
    fn test_translation_moves_points() {
        let m = translation(0.0, 0.0, -10.0);
        let p = m * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(p, Vec4::new(1.0, 2.0, -7.0, 1.0));
    }

    #[test]
    fn test_axis_rotation_normalizes_axis() {
        let unit = axis_rotation(Vec3::new(0.707, 0.707, 0.0).normalize(), 0.7);
        let raw = axis_rotation(Vec3::new(0.707, 0.707, 0.0), 0.7);
        assert!(unit.abs_diff_eq(raw, 1e-6));

        let det = raw.determinant();
        assert!((det - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_axis_rotation_keeps_axis_fixed() {
        let axis = Vec3::new(1.0, 1.0, 0.0);
        let m = axis_rotation(axis, 0.7);
        let rotated = m.transform_vector3(axis);
        assert!(rotated.abs_diff_eq(axis, 1e-5));
    }

    #[test]
    fn test_multiply_order() {
        let t = translation(0.0, 0.0, -10.0);
        let r = axis_rotation(Vec3::Z, std::f32::consts::FRAC_PI_2);
        let m = multiply(t, r);

        // rotate first, then translate
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, -10.0), 1e-5));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = multiply(
            translation(0.0, 0.0, -10.0),
            axis_rotation(Vec3::new(0.707, 0.707, 0.0), 0.7),
        );
        let identity = multiply(inverse(m), m);
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_transpose_swaps_rows_and_columns() {
        let m = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        let t = transpose(m);
        assert_eq!(t.col(0), m.row(0));
        assert_eq!(transpose(t), m);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let r = axis_rotation(Vec3::new(0.3, -0.2, 0.9), 1.1);
        assert!(normal_matrix(r).abs_diff_eq(r, 1e-5));
    }

    #[test]
    fn test_perspective_maps_near_and_far() {
        let p = perspective(std::f32::consts::PI / 8.0, 1.0, 8.0, 12.0);

        let near = p * Vec4::new(0.0, 0.0, -8.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -12.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }
}
