use crate::scene::texture::Texture;
use nalgebra::{Matrix4, Vector2, Vector3};
use std::sync::Arc;

/// The texture maps a lit surface samples. Textures are shared, not owned.
#[derive(Debug, Clone)]
pub struct MaterialMaps {
    pub diffuse: Arc<Texture>,
    pub normal: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
    pub glossiness: Option<Arc<Texture>>,
}

impl MaterialMaps {
    pub fn new(diffuse: Arc<Texture>) -> Self {
        Self {
            diffuse,
            normal: None,
            specular: None,
            glossiness: None,
        }
    }

    pub fn with_normal(mut self, normal: Arc<Texture>) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_specular(mut self, specular: Arc<Texture>) -> Self {
        self.specular = Some(specular);
        self
    }

    pub fn with_glossiness(mut self, glossiness: Arc<Texture>) -> Self {
        self.glossiness = Some(glossiness);
        self
    }

    /// Nearest-neighbour lookups for the software shading path. Hardware
    /// backends sample the textures with [`Texture::sample_filtered`].
    pub fn sample_diffuse(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.diffuse.sample(uv)
    }

    /// Missing specular map means no specular reflection.
    pub fn sample_specular(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.specular
            .as_ref()
            .map_or_else(Vector3::zeros, |t| t.sample(uv))
    }

    /// Missing glossiness map means full glossiness.
    pub fn sample_glossiness(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.glossiness
            .as_ref()
            .map_or_else(|| Vector3::repeat(1.0), |t| t.sample(uv))
    }

    pub fn sample_normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.normal
            .as_ref()
            .map(|t| t.sample(uv))
    }
}

/// How a mesh is drawn, chosen when the mesh is built.
///
/// `Opaque` meshes are lit per pixel with the full set of maps and go through
/// both paths. `AlphaBlended` meshes carry a diffuse map only and are drawn by
/// the hardware path.
#[derive(Debug, Clone)]
pub enum EffectKind {
    Opaque(MaterialMaps),
    AlphaBlended { diffuse: Arc<Texture> },
}

/// A mesh's rendering effect: the variant plus the per-draw state the hardware
/// path uploads before drawing.
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub world_matrix: Matrix4<f32>,
    pub view_inverse: Matrix4<f32>,
}

impl Effect {
    pub fn opaque(maps: MaterialMaps) -> Self {
        Self::from_kind(EffectKind::Opaque(maps))
    }

    pub fn alpha_blended(diffuse: Arc<Texture>) -> Self {
        Self::from_kind(EffectKind::AlphaBlended { diffuse })
    }

    fn from_kind(kind: EffectKind) -> Self {
        Self {
            kind,
            world_matrix: Matrix4::identity(),
            view_inverse: Matrix4::identity(),
        }
    }

    /// Replaces the maps. An alpha-blended effect keeps only the diffuse map.
    pub fn set_material_maps(&mut self, maps: MaterialMaps) {
        match &mut self.kind {
            EffectKind::Opaque(current) => *current = maps,
            EffectKind::AlphaBlended { diffuse } => *diffuse = maps.diffuse,
        }
    }

    pub fn set_world_matrix(&mut self, world: Matrix4<f32>) {
        self.world_matrix = world;
    }

    pub fn set_view_inverse(&mut self, view_inverse: Matrix4<f32>) {
        self.view_inverse = view_inverse;
    }

    /// Maps for the software lighting model, if this effect is lit.
    pub fn material_maps(&self) -> Option<&MaterialMaps> {
        match &self.kind {
            EffectKind::Opaque(maps) => Some(maps),
            EffectKind::AlphaBlended { .. } => None,
        }
    }

    pub fn is_alpha_blended(&self) -> bool {
        matches!(self.kind, EffectKind::AlphaBlended { .. })
    }
}
