use nalgebra::Vector3;

/// Background used by the software path.
pub const SOFTWARE_CLEAR: Vector3<f32> = Vector3::new(0.39, 0.39, 0.39);
/// Background used by the hardware path.
pub const HARDWARE_CLEAR: Vector3<f32> = Vector3::new(0.39, 0.59, 0.93);
/// Shared background when the uniform background toggle is on.
pub const UNIFORM_CLEAR: Vector3<f32> = Vector3::new(0.1, 0.1, 0.1);

pub const WHITE: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);
pub const BLACK: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);

/// Scales an over-bright color back into range while keeping its hue.
///
/// If any channel exceeds 1, every channel is divided by the largest one.
pub fn max_to_one(color: Vector3<f32>) -> Vector3<f32> {
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Quantizes a color in `[0, 1]` to 8 bits per channel.
#[inline]
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    [
        (color.x.clamp(0.0, 1.0) * 255.0) as u8,
        (color.y.clamp(0.0, 1.0) * 255.0) as u8,
        (color.z.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Packs a color in `[0, 1]` into `0xAARRGGBB` with an opaque alpha.
#[inline]
pub fn to_argb_u32(color: Vector3<f32>) -> u32 {
    let [r, g, b] = to_rgb8(color);
    (255 << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}
