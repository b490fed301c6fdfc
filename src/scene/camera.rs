use crate::core::math::transform::{TransformFactory, transform_vector};
use nalgebra::{Matrix4, Point3, Vector3};

/// Snapshot of the input devices for one frame, filled in by whoever owns the
/// window. Mouse deltas are in device units since the previous frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub mouse_dx: i32,
    pub mouse_dy: i32,
    pub left_button: bool,
    pub right_button: bool,
}

/// Left-handed free-fly camera (+Z forward) with cached matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    /// Vertical field of view in degrees.
    pub fov_angle: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,

    pub total_pitch: f32,
    pub total_yaw: f32,

    pub movement_speed: f32,
    /// Radians per mouse unit per second.
    pub rotation_speed: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    inv_view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(fov_angle: f32, origin: Point3<f32>, aspect_ratio: f32) -> Self {
        let mut cam = Self {
            origin,
            fov_angle,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            movement_speed: 15.0,
            rotation_speed: 10.0_f32.to_radians(),
            view_matrix: Matrix4::identity(),
            inv_view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_projection_matrix();
        cam.update_view_matrix();
        cam
    }

    /// `tan(fov / 2)`, the form the projection matrix wants.
    pub fn fov(&self) -> f32 {
        (self.fov_angle.to_radians() / 2.0).tan()
    }

    /// Rebuilds the orthonormal basis from `forward` and refreshes the view matrices.
    pub fn update_view_matrix(&mut self) {
        let world_up = Vector3::y();
        self.right = world_up.cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right);
        self.inv_view_matrix =
            TransformFactory::basis(&self.right, &self.up, &self.forward, &self.origin);
        self.view_matrix =
            TransformFactory::view(&self.right, &self.up, &self.forward, &self.origin);
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            TransformFactory::perspective_fov_lh(self.fov(), self.aspect_ratio, self.near, self.far);
    }

    /// Applies one frame of input and refreshes the view matrices.
    ///
    /// Keys translate along forward/right. Left drag yaws and dollies,
    /// right drag yaws and pitches, both buttons together move along up.
    pub fn update(&mut self, input: &CameraInput, delta_time: f32) {
        let step = delta_time * self.movement_speed;

        if input.forward {
            self.origin += self.forward * step;
        }
        if input.backward {
            self.origin -= self.forward * step;
        }
        if input.right {
            self.origin += self.right * step;
        }
        if input.left {
            self.origin -= self.right * step;
        }

        let dx = input.mouse_dx as f32;
        let dy = input.mouse_dy as f32;
        let turn = self.rotation_speed * delta_time;

        if input.left_button && input.right_button {
            if input.mouse_dy != 0 {
                self.origin -= self.up * step * dy.signum();
            }
        } else if input.left_button {
            self.total_yaw += dx * turn;
            if input.mouse_dy != 0 {
                self.origin -= self.forward * step * dy.signum();
            }
        } else if input.right_button {
            self.total_yaw += dx * turn;
            self.total_pitch -= dy * turn;
        }

        let rotation = TransformFactory::rotation_pitch_yaw(self.total_pitch, self.total_yaw);
        self.forward = transform_vector(&rotation, &Vector3::z()).normalize();

        self.update_view_matrix();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn inv_view_matrix(&self) -> Matrix4<f32> {
        self.inv_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}
