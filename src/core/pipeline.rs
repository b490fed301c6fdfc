use log::{info, warn};
use serde::Deserialize;

/// Which pipeline produces the frame.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Software,
    Hardware,
}

/// Which faces are discarded, judged by the triangle's average world normal
/// against the camera's forward direction.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

/// Output of the per-pixel lighting model.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

/// Texture filtering used when sampling material maps.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filtering {
    #[default]
    Point,
    Linear,
    Anisotropic,
}

/// Debug output replacing regular shading. The variants exclude each other.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visualization {
    #[default]
    Shaded,
    BoundingBoxes,
    DepthBuffer,
}

/// A single state transition requested by the input collaborator.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Toggle {
    RenderMode,
    Rotation,
    AlphaMeshes,
    Filtering,
    ShadingMode,
    NormalMap,
    DepthBuffer,
    BoundingBoxes,
    CullMode,
    UniformBackground,
}

/// Pipeline configuration threaded through every frame.
///
/// Mutated only between frames; each transition logs a status line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    pub shading_mode: ShadingMode,
    pub filtering: Filtering,
    pub visualization: Visualization,
    pub use_normal_map: bool,
    pub rotate: bool,
    pub uniform_background: bool,
    pub draw_alpha_meshes: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Software,
            cull_mode: CullMode::Back,
            shading_mode: ShadingMode::Combined,
            filtering: Filtering::Point,
            visualization: Visualization::Shaded,
            use_normal_map: true,
            rotate: true,
            uniform_background: false,
            draw_alpha_meshes: true,
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

impl RenderSettings {
    pub fn apply(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::RenderMode => self.switch_render_mode(),
            Toggle::Rotation => self.toggle_rotation(),
            Toggle::AlphaMeshes => self.toggle_alpha_meshes(),
            Toggle::Filtering => self.cycle_filtering(),
            Toggle::ShadingMode => self.cycle_shading_mode(),
            Toggle::NormalMap => self.toggle_normal_map(),
            Toggle::DepthBuffer => self.toggle_depth_buffer(),
            Toggle::BoundingBoxes => self.toggle_bounding_boxes(),
            Toggle::CullMode => self.cycle_cull_mode(),
            Toggle::UniformBackground => self.toggle_uniform_background(),
        }
    }

    fn software_only(&self, what: &str) -> bool {
        if self.render_mode == RenderMode::Software {
            true
        } else {
            warn!("{what} is only available in software mode");
            false
        }
    }

    pub fn switch_render_mode(&mut self) {
        self.render_mode = match self.render_mode {
            RenderMode::Software => RenderMode::Hardware,
            RenderMode::Hardware => RenderMode::Software,
        };
        info!("Rasterizer mode = {:?}", self.render_mode);
    }

    pub fn cycle_cull_mode(&mut self) {
        self.cull_mode = match self.cull_mode {
            CullMode::Back => CullMode::Front,
            CullMode::Front => CullMode::None,
            CullMode::None => CullMode::Back,
        };
        info!("Cull mode = {:?}", self.cull_mode);
    }

    pub fn cycle_shading_mode(&mut self) {
        if !self.software_only("Shading mode") {
            return;
        }
        self.shading_mode = match self.shading_mode {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        };
        info!("Shading mode = {:?}", self.shading_mode);
    }

    /// Hardware only: the software path always samples nearest-neighbour.
    pub fn cycle_filtering(&mut self) {
        if self.render_mode != RenderMode::Hardware {
            warn!("Sample filtering can only be changed in hardware mode");
            return;
        }
        self.filtering = match self.filtering {
            Filtering::Point => Filtering::Linear,
            Filtering::Linear => Filtering::Anisotropic,
            Filtering::Anisotropic => Filtering::Point,
        };
        info!("Sample filter = {:?}", self.filtering);
    }

    pub fn toggle_normal_map(&mut self) {
        if self.software_only("Normal map") {
            self.use_normal_map = !self.use_normal_map;
            info!("Normal map {}", on_off(self.use_normal_map));
        }
    }

    pub fn toggle_bounding_boxes(&mut self) {
        if self.software_only("Bounding box visualization") {
            self.visualization = match self.visualization {
                Visualization::BoundingBoxes => Visualization::Shaded,
                _ => Visualization::BoundingBoxes,
            };
            info!(
                "Visualize bounding boxes {}",
                on_off(self.visualization == Visualization::BoundingBoxes)
            );
        }
    }

    pub fn toggle_depth_buffer(&mut self) {
        if self.software_only("Depth buffer visualization") {
            self.visualization = match self.visualization {
                Visualization::DepthBuffer => Visualization::Shaded,
                _ => Visualization::DepthBuffer,
            };
            info!(
                "Show depth buffer {}",
                on_off(self.visualization == Visualization::DepthBuffer)
            );
        }
    }

    pub fn toggle_rotation(&mut self) {
        self.rotate = !self.rotate;
        info!("Rotation {}", on_off(self.rotate));
    }

    pub fn toggle_uniform_background(&mut self) {
        self.uniform_background = !self.uniform_background;
        info!("Uniform background {}", on_off(self.uniform_background));
    }

    pub fn toggle_alpha_meshes(&mut self) {
        if self.render_mode == RenderMode::Hardware {
            self.draw_alpha_meshes = !self.draw_alpha_meshes;
            info!("Alpha-blended meshes {}", on_off(self.draw_alpha_meshes));
        } else {
            warn!("Alpha-blended meshes are only drawn in hardware mode");
        }
    }
}
