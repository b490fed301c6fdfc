use crate::core::color::{HARDWARE_CLEAR, SOFTWARE_CLEAR, UNIFORM_CLEAR, max_to_one};
use crate::core::error::RenderError;
use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::{RenderMode, RenderSettings};
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::{shader, vertex};
use crate::scene::context::Scene;
use log::{debug, warn};
use nalgebra::Vector3;

/// A GPU-style pipeline that draws the scene itself.
///
/// Before `render` is called the renderer has pushed every mesh's world matrix
/// and the camera's inverse view matrix into the mesh's [`Effect`]. The backend
/// owns its own render target; it is expected to clear with [`clear_color`],
/// honor `settings.cull_mode` and `settings.filtering`, and draw alpha-blended
/// meshes without culling when `settings.draw_alpha_meshes` is set.
///
/// [`Effect`]: crate::scene::material::Effect
pub trait HardwareBackend {
    fn name(&self) -> &str;

    fn render(&mut self, scene: &Scene, settings: &RenderSettings) -> Result<(), RenderError>;
}

/// Background color for the current mode.
pub fn clear_color(settings: &RenderSettings) -> Vector3<f32> {
    if settings.uniform_background {
        return UNIFORM_CLEAR;
    }
    match settings.render_mode {
        RenderMode::Software => SOFTWARE_CLEAR,
        RenderMode::Hardware => HARDWARE_CLEAR,
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
    pub settings: RenderSettings,
    hardware: Option<Box<dyn HardwareBackend>>,
    warned_missing_backend: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            settings,
            hardware: None,
            warned_missing_backend: false,
        }
    }

    pub fn with_hardware_backend(mut self, backend: Box<dyn HardwareBackend>) -> Self {
        self.hardware = Some(backend);
        self
    }

    /// Renders one frame in the current mode.
    ///
    /// Hardware mode without an installed backend falls back to the software
    /// path (warning once).
    pub fn render_frame(&mut self, scene: &mut Scene) -> Result<(), RenderError> {
        if self.settings.render_mode == RenderMode::Hardware {
            if let Some(backend) = self.hardware.as_deref_mut() {
                return render_hardware(backend, &self.settings, scene);
            }
            if !self.warned_missing_backend {
                warn!("No hardware backend installed, rendering in software");
                self.warned_missing_backend = true;
            }
        }
        self.render_software(scene)
    }

    /// Software path: clear, then transform, rasterize and shade every lit mesh.
    ///
    /// Alpha-blended meshes have no software shading and are skipped.
    pub fn render_software(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.framebuffer.clear(clear_color(&self.settings));

        let rasterizer = Rasterizer {
            cull_mode: self.settings.cull_mode,
            visualization: self.settings.visualization,
        };

        for mesh in &scene.meshes {
            let Some(maps) = mesh.effect.material_maps() else {
                continue;
            };

            let vertices = vertex::transform(mesh, &scene.camera);
            let fragments =
                rasterizer.rasterize(mesh, &vertices, &scene.camera, &mut self.framebuffer)?;
            debug!("{} fragments passed depth", fragments.len());

            // Later fragments for a pixel are always nearer, so in-order writes
            // leave the nearest surface's color.
            for fragment in &fragments {
                let color = shader::shade(
                    fragment,
                    self.settings.shading_mode,
                    self.settings.use_normal_map,
                    maps,
                );
                self.framebuffer
                    .set_pixel(fragment.x, fragment.y, max_to_one(color));
            }
        }

        Ok(())
    }
}

/// Pushes the per-draw state into every mesh's effect, then hands the frame
/// to the backend.
fn render_hardware(
    backend: &mut dyn HardwareBackend,
    settings: &RenderSettings,
    scene: &mut Scene,
) -> Result<(), RenderError> {
    let view_inverse = scene.camera.inv_view_matrix();
    for mesh in &mut scene.meshes {
        let world = mesh.world_matrix();
        mesh.effect.set_world_matrix(world);
        mesh.effect.set_view_inverse(view_inverse);
    }

    debug!("Delegating frame to hardware backend '{}'", backend.name());
    backend.render(scene, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::Toggle;
    use crate::scene::camera::Camera;
    use crate::scene::material::{Effect, MaterialMaps};
    use crate::scene::mesh::Mesh;
    use crate::scene::texture::Texture;
    use nalgebra::{Matrix4, Point3};
    use std::sync::{Arc, Mutex};

    fn white() -> Arc<Texture> {
        Arc::new(Texture::solid(Vector3::repeat(1.0)))
    }

    fn scene_with(effect: Effect) -> Scene {
        let mut mesh = Mesh::create_test_triangle(effect);
        mesh.set_position(Vector3::new(0.0, 0.0, 10.0));
        Scene::new(Camera::new(45.0, Point3::origin(), 1.0), vec![mesh])
    }

    #[derive(Default)]
    struct Recorded {
        frames: usize,
        world: Option<Matrix4<f32>>,
        view_inverse: Option<Matrix4<f32>>,
    }

    struct RecordingBackend(Arc<Mutex<Recorded>>);

    impl HardwareBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn render(&mut self, scene: &Scene, _: &RenderSettings) -> Result<(), RenderError> {
            let mut rec = self.0.lock().unwrap();
            rec.frames += 1;
            rec.world = Some(scene.meshes[0].effect.world_matrix);
            rec.view_inverse = Some(scene.meshes[0].effect.view_inverse);
            Ok(())
        }
    }

    #[test]
    fn clear_color_depends_on_mode_and_uniform_flag() {
        let mut settings = RenderSettings::default();
        assert_eq!(clear_color(&settings), SOFTWARE_CLEAR);
        settings.apply(Toggle::RenderMode);
        assert_eq!(clear_color(&settings), HARDWARE_CLEAR);
        settings.apply(Toggle::UniformBackground);
        assert_eq!(clear_color(&settings), UNIFORM_CLEAR);
    }

    #[test]
    fn software_frame_draws_the_triangle_over_the_background() {
        let mut scene = scene_with(Effect::opaque(MaterialMaps::new(white())));
        let mut renderer = Renderer::new(64, 64, RenderSettings::default());

        renderer.render_frame(&mut scene).unwrap();

        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(SOFTWARE_CLEAR));
        let center = renderer.framebuffer.get_pixel(32, 40).unwrap();
        assert_ne!(center, SOFTWARE_CLEAR);
        assert!(center.max() <= 1.0);
    }

    #[test]
    fn alpha_blended_meshes_are_skipped_in_software() {
        let mut scene = scene_with(Effect::alpha_blended(white()));
        let mut renderer = Renderer::new(32, 32, RenderSettings::default());

        renderer.render_frame(&mut scene).unwrap();

        assert!(
            renderer
                .framebuffer
                .depth_buffer()
                .iter()
                .all(|&d| d == f32::MAX)
        );
    }

    #[test]
    fn hardware_mode_without_backend_falls_back_to_software() {
        let mut scene = scene_with(Effect::opaque(MaterialMaps::new(white())));
        let mut settings = RenderSettings::default();
        settings.apply(Toggle::RenderMode);
        let mut renderer = Renderer::new(32, 32, settings);

        renderer.render_frame(&mut scene).unwrap();

        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(HARDWARE_CLEAR));
        assert!(renderer.framebuffer.get_depth(16, 20).unwrap() < f32::MAX);
    }

    #[test]
    fn hardware_mode_uploads_matrices_before_delegating() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut scene = scene_with(Effect::opaque(MaterialMaps::new(white())));
        let mut settings = RenderSettings::default();
        settings.apply(Toggle::RenderMode);
        let mut renderer = Renderer::new(32, 32, settings)
            .with_hardware_backend(Box::new(RecordingBackend(recorded.clone())));

        renderer.render_frame(&mut scene).unwrap();

        let rec = recorded.lock().unwrap();
        assert_eq!(rec.frames, 1);
        assert_eq!(rec.world, Some(scene.meshes[0].world_matrix()));
        assert_eq!(rec.view_inverse, Some(scene.camera.inv_view_matrix()));
        // Software buffers stay untouched.
        assert_eq!(renderer.framebuffer.get_depth(16, 20), Some(f32::MAX));
    }
}
