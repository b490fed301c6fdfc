use crate::scene::camera::{Camera, CameraInput};
use crate::scene::mesh::Mesh;

/// Holds all scene resources required for rendering.
pub struct Scene {
    pub camera: Camera,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera: Camera, meshes: Vec<Mesh>) -> Self {
        Self { camera, meshes }
    }

    /// Per-frame update: camera input first, then mesh rotation when enabled.
    pub fn update(&mut self, input: &CameraInput, delta_time: f32, rotate: bool) {
        self.camera.update(input, delta_time);

        if rotate {
            for mesh in &mut self.meshes {
                mesh.update(delta_time);
            }
        }
    }
}
