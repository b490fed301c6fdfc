use crate::core::error::LoadError;
use crate::core::pipeline::Filtering;
use image::{DynamicImage, Rgb, RgbImage};
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Represents a 2D texture map held in CPU memory.
///
/// Samples return linear `[0, 1]` channel values with wrap (repeat)
/// addressing; no color-space conversion is applied.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| LoadError::Texture {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let texture = Self::from_image(img);
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let image = img.to_rgb8();
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// A 1x1 texture of a single color, handy for fallback materials.
    pub fn solid(color: Vector3<f32>) -> Self {
        let [r, g, b] = crate::core::color::to_rgb8(color);
        Self::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            1,
            1,
            Rgb([r, g, b]),
        )))
    }

    /// Nearest-neighbour lookup with wrap addressing.
    ///
    /// `u = 1.25` reads the same texel as `u = 0.25`; negative coordinates wrap
    /// from the opposite edge.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let w = self.width as i64;
        let h = self.height as i64;
        let px = ((uv.x * (w - 1) as f32) as i64).rem_euclid(w);
        let py = ((uv.y * (h - 1) as f32) as i64).rem_euclid(h);
        self.get_pixel_wrapped(px, py)
    }

    /// Samples with the requested filter.
    ///
    /// `Linear` and `Anisotropic` both use bilinear filtering on the CPU.
    pub fn sample_filtered(&self, uv: Vector2<f32>, filtering: Filtering) -> Vector3<f32> {
        match filtering {
            Filtering::Point => self.sample(uv),
            Filtering::Linear | Filtering::Anisotropic => self.sample_bilinear(uv),
        }
    }

    fn sample_bilinear(&self, uv: Vector2<f32>) -> Vector3<f32> {
        // Pixel centers sit at +0.5.
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let wx = x - x.floor();
        let wy = y - y.floor();

        let c00 = self.get_pixel_wrapped(x0, y0);
        let c10 = self.get_pixel_wrapped(x0 + 1, y0);
        let c01 = self.get_pixel_wrapped(x0, y0 + 1);
        let c11 = self.get_pixel_wrapped(x0 + 1, y0 + 1);

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    /// Texel fetch with repeat addressing on both axes.
    fn get_pixel_wrapped(&self, x: i64, y: i64) -> Vector3<f32> {
        let x_wrapped = x.rem_euclid(self.width as i64) as u32;
        let y_wrapped = y.rem_euclid(self.height as i64) as u32;
        let pixel = self.image.get_pixel(x_wrapped, y_wrapped);

        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}
