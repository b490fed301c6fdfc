use crate::core::color::WHITE;
use crate::core::error::LoadError;
use crate::io::config::{Config, EffectConfig, MeshConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::Scene;
use crate::scene::material::{Effect, MaterialMaps};
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Where the fallback triangle sits when no configured mesh could be loaded.
const FALLBACK_POSITION: Vector3<f32> = Vector3::new(0.0, 0.0, 10.0);

/// Builds the camera from the config's `[camera]` table.
pub fn build_camera(config: &Config) -> Camera {
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;
    let mut camera = Camera::new(
        config.camera.fov,
        Point3::from(config.camera.origin),
        aspect_ratio,
    );
    camera.near = config.camera.near;
    camera.far = config.camera.far;
    camera.update_projection_matrix();
    camera
}

/// Loads one configured mesh with its textures and effect.
///
/// Maps left out of the config fall back to the material defaults; a map that
/// is configured but fails to load fails the whole mesh.
pub fn load_mesh(mesh_conf: &MeshConfig) -> Result<Mesh, LoadError> {
    let (vertices, indices) = load_obj(&mesh_conf.obj)?;
    let diffuse = Arc::new(Texture::load(&mesh_conf.diffuse)?);

    let effect = match mesh_conf.effect {
        EffectConfig::Opaque => {
            let mut maps = MaterialMaps::new(diffuse);
            if let Some(texture) = load_optional(mesh_conf.normal.as_deref())? {
                maps = maps.with_normal(texture);
            }
            if let Some(texture) = load_optional(mesh_conf.specular.as_deref())? {
                maps = maps.with_specular(texture);
            }
            if let Some(texture) = load_optional(mesh_conf.glossiness.as_deref())? {
                maps = maps.with_glossiness(texture);
            }
            Effect::opaque(maps)
        }
        EffectConfig::Alpha => Effect::alpha_blended(diffuse),
    };

    let mut mesh = Mesh::new(vertices, indices, mesh_conf.topology, effect)?;
    mesh.set_position(Vector3::from(mesh_conf.position));
    Ok(mesh)
}

fn load_optional(path: Option<&str>) -> Result<Option<Arc<Texture>>, LoadError> {
    path.map(|p| Texture::load(p).map(Arc::new)).transpose()
}

/// Initial resource loading. Meshes that fail to load are logged and left out;
/// if none remain, a white test triangle takes their place.
pub fn init_scene(config: &Config) -> Scene {
    let camera = build_camera(config);

    let mut meshes = Vec::new();
    for mesh_conf in &config.meshes {
        match load_mesh(mesh_conf) {
            Ok(mesh) => meshes.push(mesh),
            Err(e) => error!("Error loading mesh '{}': {}", mesh_conf.obj, e),
        }
    }

    if meshes.is_empty() {
        warn!("No meshes loaded. Using fallback triangle.");
        let maps = MaterialMaps::new(Arc::new(Texture::solid(WHITE)));
        let mut triangle = Mesh::create_test_triangle(Effect::opaque(maps));
        triangle.set_position(FALLBACK_POSITION);
        meshes.push(triangle);
    }

    info!("Scene initialized with {} meshes.", meshes.len());
    Scene::new(camera, meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::Topology;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::{Path, PathBuf};

    #[test]
    fn missing_assets_fall_back_to_the_test_triangle() {
        let config = Config::parse(
            r#"
            [[meshes]]
            obj = "missing/model.obj"
            diffuse = "missing/diffuse.png"
            "#,
        )
        .unwrap();

        let scene = init_scene(&config);

        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].indices(), &[0, 1, 2]);
        assert_eq!(scene.meshes[0].position, FALLBACK_POSITION);
        assert!(!scene.meshes[0].effect.is_alpha_blended());
    }

    /// Writes a one-triangle OBJ and a 1x1 PNG next to each other in the temp dir.
    fn write_assets(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir();
        let stem = format!("dual_rasterizer_loader_{}_{tag}", std::process::id());
        let obj = dir.join(format!("{stem}.obj"));
        let png = dir.join(format!("{stem}.png"));
        let triangle = "v 0 1 0\nv 1 -1 0\nv -1 -1 0\nvt 0.5 1\nvt 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        fs::write(&obj, triangle).unwrap();
        RgbImage::from_pixel(1, 1, Rgb([200, 100, 50])).save(&png).unwrap();
        (obj, png)
    }

    fn mesh_config(obj: &Path, diffuse: &Path, specular: Option<&str>) -> MeshConfig {
        MeshConfig {
            obj: obj.to_string_lossy().into_owned(),
            diffuse: diffuse.to_string_lossy().into_owned(),
            normal: None,
            specular: specular.map(str::to_string),
            glossiness: None,
            position: [1.0, 2.0, 20.0],
            effect: EffectConfig::Opaque,
            topology: Topology::List,
        }
    }

    #[test]
    fn unconfigured_maps_use_material_defaults() {
        let (obj, png) = write_assets("defaults");
        let result = load_mesh(&mesh_config(&obj, &png, None));
        fs::remove_file(&obj).ok();
        fs::remove_file(&png).ok();

        let mesh = result.unwrap();
        let maps = mesh.effect.material_maps().unwrap();
        assert!(maps.specular.is_none());
        assert_eq!(mesh.position, Vector3::new(1.0, 2.0, 20.0));
    }

    #[test]
    fn configured_map_that_fails_to_load_fails_the_mesh() {
        let (obj, png) = write_assets("bad_specular");
        let conf = mesh_config(&obj, &png, Some("does/not/exist.png"));

        let result = load_mesh(&conf);
        let scene = init_scene(&Config {
            render: Default::default(),
            camera: Default::default(),
            meshes: vec![conf, mesh_config(&obj, &png, None)],
        });
        fs::remove_file(&obj).ok();
        fs::remove_file(&png).ok();

        assert!(matches!(result, Err(LoadError::Texture { .. })));
        // Only the broken mesh is left out; no fallback triangle is needed.
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].position, Vector3::new(1.0, 2.0, 20.0));
    }

    #[test]
    fn camera_follows_config() {
        let config = Config::parse(
            "[render]\nwidth = 200\nheight = 100\n[camera]\nfov = 90.0\nfar = 50.0\n",
        )
        .unwrap();

        let camera = build_camera(&config);

        assert_eq!(camera.aspect_ratio, 2.0);
        assert_eq!(camera.far, 50.0);
        assert!((camera.fov() - 1.0).abs() < 1e-6);
    }
}
