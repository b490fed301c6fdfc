use nalgebra::{Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating transformation matrices.
///
/// Everything is built for a **left-handed** system (+Z into the screen) and
/// column vectors, so a world-view-projection chain reads `proj * view * world`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Pitch (around X) followed by yaw (around Y).
    pub fn rotation_pitch_yaw(pitch_rad: f32, yaw_rad: f32) -> Matrix4<f32> {
        Self::rotation_y(yaw_rad) * Self::rotation_x(pitch_rad)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Camera-to-world matrix from an orthonormal basis and an origin.
    pub fn basis(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// World-to-camera matrix: the rigid inverse of [`TransformFactory::basis`].
    pub fn view(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        let o = origin.coords;
        Matrix4::new(
            right.x,   right.y,   right.z,   -right.dot(&o),
            up.x,      up.y,      up.z,      -up.dot(&o),
            forward.x, forward.y, forward.z, -forward.dot(&o),
            0.0,       0.0,       0.0,       1.0,
        )
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is `tan(fov_y / 2)`. View-space depth in `[near, far]` maps to
    /// NDC z in `[0, 1]`; clip w is the view-space depth.
    pub fn perspective_fov_lh(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let range = far / (far - near);
        Matrix4::new(
            1.0 / (aspect_ratio * fov), 0.0,       0.0,   0.0,
            0.0,                        1.0 / fov, 0.0,   0.0,
            0.0,                        0.0,       range, -near * range,
            0.0,                        0.0,       1.0,   0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs the perspective divide on x, y and z, keeping the pre-divide w.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector4<f32> {
    let w = clip.w;
    Vector4::new(clip.x / w, clip.y / w, clip.z / w, w)
}

/// Transforms a point by an affine matrix.
#[inline]
pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    let p = matrix * point.to_homogeneous();
    Point3::new(p.x, p.y, p.z)
}

/// Transforms a direction by the upper 3x3 of a matrix (no translation).
#[inline]
pub fn transform_vector(matrix: &Matrix4<f32>, vector: &Vector3<f32>) -> Vector3<f32> {
    matrix.fixed_view::<3, 3>(0, 0) * vector
}
