//! 4x4 transform construction and composition.
//!
//! Every function here is pure and returns a new [`Mat4`]. Storage is
//! column-major, which is what both `glam` and the WGSL `mat4x4<f32>` uniform
//! expect.
//!
//! Composition always multiplies the running matrix on the right:
//!
//! ```
//! use letterspin::math;
//!
//! let m = math::translate(glam::Mat4::IDENTITY, 10.0, 0.0, 0.0);
//! let m = math::scale(m, 2.0, 2.0, 2.0);
//!
//! // The scale is applied to the point first, then the translation.
//! let p = m.transform_point3(glam::Vec3::new(1.0, 0.0, 0.0));
//! assert_eq!(p, glam::Vec3::new(12.0, 0.0, 0.0));
//! ```
//!
//! NaN and infinite inputs are not trapped; they propagate through the
//! arithmetic like any other float.

use glam::{Mat4, Vec3};

/// Constant skew applied to the base position before the user translation.
///
/// Its last column is `(1, 1, 1, 1)`, so it nudges the whole model by one
/// unit along each axis.
#[rustfmt::skip]
pub const CORNER_SHEAR: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    1.0, 1.0, 1.0, 1.0,
]);

/// Right-handed perspective projection with GL clip space (NDC z in `[-1, 1]`).
///
/// Returns `None` when `aspect` is not positive or `far <= near`. Callers
/// with a zero-height viewport must not get this far.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Option<Mat4> {
    if aspect <= 0.0 || far <= near {
        return None;
    }

    let f = (std::f32::consts::FRAC_PI_2 - 0.5 * fov_degrees.to_radians()).tan();
    let range_inv = 1.0 / (near - far);

    #[rustfmt::skip]
    let m = Mat4::from_cols_array(&[
        f / aspect, 0.0, 0.0,                          0.0,
        0.0,        f,   0.0,                          0.0,
        0.0,        0.0, (near + far) * range_inv,    -1.0,
        0.0,        0.0, near * far * range_inv * 2.0, 0.0,
    ]);
    Some(m)
}

/// Matrix product `a * b`.
///
/// Not commutative: `b` is the transform applied to points first.
pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

pub fn translate(m: Mat4, dx: f32, dy: f32, dz: f32) -> Mat4 {
    multiply(m, Mat4::from_translation(Vec3::new(dx, dy, dz)))
}

pub fn x_rotate(m: Mat4, radians: f32) -> Mat4 {
    multiply(m, Mat4::from_rotation_x(radians))
}

pub fn y_rotate(m: Mat4, radians: f32) -> Mat4 {
    multiply(m, Mat4::from_rotation_y(radians))
}

pub fn z_rotate(m: Mat4, radians: f32) -> Mat4 {
    multiply(m, Mat4::from_rotation_z(radians))
}

pub fn scale(m: Mat4, sx: f32, sy: f32, sz: f32) -> Mat4 {
    multiply(m, Mat4::from_scale(Vec3::new(sx, sy, sz)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx_eq(a: Mat4, b: Mat4, eps: f32) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() <= eps * x.abs().max(y.abs()).max(1.0))
    }

    /// Small xorshift generator so the tests stay deterministic.
    struct Rng(u32);

    impl Rng {
        fn next_f32(&mut self) -> f32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 17;
            self.0 ^= self.0 << 5;
            (self.0 as f32 / u32::MAX as f32) * 4.0 - 2.0
        }

        fn matrix(&mut self) -> Mat4 {
            let mut cols = [0.0; 16];
            for c in cols.iter_mut() {
                *c = self.next_f32();
            }
            Mat4::from_cols_array(&cols)
        }
    }

    #[test]
    fn multiply_is_associative() {
        let mut rng = Rng(0x9e37_79b9);
        for _ in 0..64 {
            let (a, b, c) = (rng.matrix(), rng.matrix(), rng.matrix());
            let left = multiply(multiply(a, b), c);
            let right = multiply(a, multiply(b, c));
            assert!(approx_eq(left, right, 1e-4), "{left:?} != {right:?}");
        }
    }

    #[test]
    fn multiply_is_not_commutative() {
        let t = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let r = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(!approx_eq(multiply(t, r), multiply(r, t), 1e-6));
    }

    #[test]
    fn rotations_follow_right_hand_rule() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let p = x_rotate(Mat4::IDENTITY, quarter).transform_point3(Vec3::Y);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-6));
        let p = y_rotate(Mat4::IDENTITY, quarter).transform_point3(Vec3::Z);
        assert!(p.abs_diff_eq(Vec3::X, 1e-6));
        let p = z_rotate(Mat4::IDENTITY, quarter).transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn corner_shear_offsets_by_one() {
        let p = CORNER_SHEAR.transform_point3(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(p, Vec3::new(11.0, 21.0, 31.0));
    }

    #[test]
    fn perspective_maps_frustum_depths_into_clip_range() {
        let (near, far) = (1.0, 1000.0);
        let proj = perspective(45.0, 1.5, near, far).unwrap();

        let ndc_z = |depth: f32| {
            let clip = proj * Vec4::new(0.0, 0.0, -depth, 1.0);
            clip.z / clip.w
        };

        assert!((ndc_z(near) + 1.0).abs() < 1e-5);
        assert!((ndc_z(far) - 1.0).abs() < 1e-4);
        let mid = ndc_z((near + far) / 2.0);
        assert!((-1.0..=1.0).contains(&mid), "mid depth mapped to {mid}");
    }

    #[test]
    fn perspective_matches_glam_gl_projection() {
        let ours = perspective(45.0, 4.0 / 3.0, 1.0, 1000.0).unwrap();
        let reference = Mat4::perspective_rh_gl(45f32.to_radians(), 4.0 / 3.0, 1.0, 1000.0);
        assert!(approx_eq(ours, reference, 1e-5));
    }

    #[test]
    fn perspective_rejects_degenerate_input() {
        assert!(perspective(45.0, 0.0, 1.0, 1000.0).is_none());
        assert!(perspective(45.0, -1.0, 1.0, 1000.0).is_none());
        assert!(perspective(45.0, 1.0, 10.0, 10.0).is_none());
        assert!(perspective(45.0, 1.0, 10.0, 1.0).is_none());
    }

    #[test]
    fn nan_propagates_without_trapping() {
        let m = translate(Mat4::IDENTITY, f32::NAN, 0.0, 0.0);
        assert!(m.w_axis.x.is_nan());
    }
}
