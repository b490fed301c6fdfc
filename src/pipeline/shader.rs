use crate::core::color::BLACK;
use crate::core::geometry::Fragment;
use crate::core::pipeline::ShadingMode;
use crate::scene::material::MaterialMaps;
use nalgebra::{Matrix3, Vector3};
use std::f32::consts::PI;

/// Direction the scene light travels (away from the surfaces it hits).
pub const LIGHT_DIRECTION: Vector3<f32> = Vector3::new(0.577, -0.577, 0.577);
pub const LIGHT_INTENSITY: f32 = 7.0;
pub const AMBIENT: Vector3<f32> = Vector3::new(0.025, 0.025, 0.025);
pub const SHININESS: f32 = 25.0;

/// Per-pixel Lambert + Phong lighting for a single fixed directional light.
///
/// Maps are always sampled nearest-neighbour; filtering modes only apply to
/// hardware backends. Returns the raw color; callers normalize it with
/// [`max_to_one`](crate::core::color::max_to_one) before writing it out.
pub fn shade(
    fragment: &Fragment,
    shading_mode: ShadingMode,
    use_normal_map: bool,
    maps: &MaterialMaps,
) -> Vector3<f32> {
    let uv = fragment.texcoord;

    let normal = match maps.sample_normal(uv) {
        Some(sample) if use_normal_map => {
            tangent_to_world(sample, fragment.normal, fragment.tangent)
        }
        _ => fragment.normal,
    };

    let to_light = -LIGHT_DIRECTION;

    // Cosine law
    let observed_area = normal.dot(&to_light);
    if observed_area <= 0.0 {
        return BLACK;
    }

    // Diffuse (Lambert)
    let diffuse = maps.sample_diffuse(uv) * LIGHT_INTENSITY / PI;

    // Specular (Phong)
    let ks = maps.sample_specular(uv);
    let exponent = maps.sample_glossiness(uv).x * SHININESS;
    let reflected = to_light - normal * (2.0 * normal.dot(&to_light).max(0.0));
    let cosine = reflected.dot(&fragment.view_direction).max(0.0);
    let specular = ks * cosine.powf(exponent);

    match shading_mode {
        ShadingMode::ObservedArea => Vector3::repeat(observed_area),
        ShadingMode::Diffuse => diffuse * observed_area,
        ShadingMode::Specular => specular * observed_area,
        ShadingMode::Combined => (diffuse + specular) * observed_area + AMBIENT,
    }
}

/// Decodes a normal-map sample from `[0,1]` to `[-1,1]` and moves it from the
/// `(tangent, bitangent, normal)` frame into world space.
pub fn tangent_to_world(
    sample: Vector3<f32>,
    normal: Vector3<f32>,
    tangent: Vector3<f32>,
) -> Vector3<f32> {
    let decoded = sample * 2.0 - Vector3::repeat(1.0);
    let bitangent = normal.cross(&tangent);
    Matrix3::from_columns(&[tangent, bitangent, normal]) * decoded
}
