use crate::core::error::LoadError;
use crate::core::framebuffer::FrameBuffer;
use image::RgbImage;
use log::info;
use std::path::Path;

/// Quantizes the color buffer and writes it as an image; the format follows
/// the file extension.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), LoadError> {
    let path = path.as_ref();
    let img_buf = RgbImage::from_raw(
        framebuffer.width as u32,
        framebuffer.height as u32,
        framebuffer.to_rgb8(),
    )
    .ok_or_else(|| LoadError::ImageSave {
        path: path.to_path_buf(),
        source: image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        )),
    })?;

    img_buf.save(path).map_err(|source| LoadError::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved frame to {:?}", path);
    Ok(())
}
