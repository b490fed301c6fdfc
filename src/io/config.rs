use crate::core::error::LoadError;
use crate::core::pipeline::{RenderSettings, Toggle};
use crate::scene::mesh::Topology;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_meshes")]
    pub meshes: Vec<MeshConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            meshes: default_meshes(),
        }
    }
}

fn default_meshes() -> Vec<MeshConfig> {
    vec![
        MeshConfig {
            obj: "resources/vehicle.obj".to_string(),
            diffuse: "resources/vehicle_diffuse.png".to_string(),
            normal: Some("resources/vehicle_normal.png".to_string()),
            specular: Some("resources/vehicle_specular.png".to_string()),
            glossiness: Some("resources/vehicle_gloss.png".to_string()),
            position: default_mesh_position(),
            effect: EffectConfig::Opaque,
            topology: Topology::List,
        },
        MeshConfig {
            obj: "resources/fireFX.obj".to_string(),
            diffuse: "resources/fireFX_diffuse.png".to_string(),
            normal: None,
            specular: None,
            glossiness: None,
            position: default_mesh_position(),
            effect: EffectConfig::Alpha,
            topology: Topology::List,
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,

    // --- Frame loop ---
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Seconds advanced per frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,

    // --- Pipeline state ---
    /// Applied in order on top of the default settings, e.g. `["cull-mode", "depth-buffer"]`.
    #[serde(default)]
    pub toggles: Vec<Toggle>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            frame_time: default_frame_time(),
            toggles: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Default settings with the configured toggles applied.
    pub fn settings(&self) -> RenderSettings {
        let mut settings = RenderSettings::default();
        for &toggle in &self.toggles {
            settings.apply(toggle);
        }
        settings
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_frame_time() -> f32 {
    1.0 / 60.0
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub origin: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

/// Which effect a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectConfig {
    /// Lit with the diffuse/normal/specular/glossiness maps.
    #[default]
    Opaque,
    /// Diffuse-only, alpha blended; hardware path only.
    Alpha,
}

#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    pub obj: String,

    // --- Material Textures ---
    pub diffuse: String,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub glossiness: Option<String>,

    // --- Transform & Drawing ---
    #[serde(default = "default_mesh_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub effect: EffectConfig,
    #[serde(default)]
    pub topology: Topology,
}

fn default_mesh_position() -> [f32; 3] {
    [0.0, 0.0, 50.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{CullMode, Visualization};

    #[test]
    fn empty_file_yields_default_scene() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 480);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.meshes.len(), 2);
        assert_eq!(config.meshes[0].effect, EffectConfig::Opaque);
        assert_eq!(config.meshes[1].effect, EffectConfig::Alpha);
        assert_eq!(config.meshes[1].position, [0.0, 0.0, 50.0]);
    }

    #[test]
    fn parses_meshes_and_toggles() {
        let config = Config::parse(
            r#"
            [render]
            width = 320
            frames = 4
            toggles = ["cull-mode", "depth-buffer"]

            [camera]
            origin = [0.0, 1.0, -5.0]

            [[meshes]]
            obj = "quad.obj"
            diffuse = "quad.png"
            topology = "strip"
            position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 480);
        assert_eq!(config.render.frames, 4);
        assert_eq!(config.camera.origin, [0.0, 1.0, -5.0]);
        assert_eq!(config.meshes.len(), 1);
        assert_eq!(config.meshes[0].topology, Topology::Strip);
        assert_eq!(config.meshes[0].effect, EffectConfig::Opaque);
        assert!(config.meshes[0].normal.is_none());

        let settings = config.render.settings();
        assert_eq!(settings.cull_mode, CullMode::Front);
        assert_eq!(settings.visualization, Visualization::DepthBuffer);
    }

    #[test]
    fn unknown_toggle_is_a_parse_error() {
        let result = Config::parse("[render]\ntoggles = [\"warp-drive\"]\n");
        assert!(matches!(result, Err(LoadError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = Config::load("no/such/scene.toml");
        assert!(matches!(result, Err(LoadError::ConfigRead { .. })));
    }
}
