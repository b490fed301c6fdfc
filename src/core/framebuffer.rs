use crate::core::color::{to_argb_u32, to_rgb8};
use nalgebra::Vector3;

/// Per-frame color and depth storage for the software path.
///
/// Color entries are already normalized into `[0, 1]`; quantization happens
/// only when the buffer is presented. Depth entries start every frame at
/// `f32::MAX` and only ever decrease while the frame is rasterized.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<Vector3<f32>>,
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Vector3::zeros(); size],
            depth_buffer: vec![f32::MAX; size],
        }
    }

    /// Fills the color buffer and resets every depth value to `f32::MAX`.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(f32::MAX);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update.
    ///
    /// Returns true and stores `new_depth` if it is strictly nearer than the
    /// value already in the buffer. Otherwise leaves the buffer untouched.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        if new_depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = new_depth;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        self.in_bounds(x, y)
            .then(|| self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.depth_buffer[self.index(x, y)])
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Row-major RGB bytes, 3 per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.color_buffer.iter().flat_map(|c| to_rgb8(*c)).collect()
    }

    /// Row-major `0xAARRGGBB` pixels for presentation surfaces.
    pub fn to_argb_u32(&self) -> Vec<u32> {
        self.color_buffer.iter().map(|c| to_argb_u32(*c)).collect()
    }
}
