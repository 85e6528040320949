//! Immutable RGBA32 texel buffer with nearest-neighbor UV sampling.

use crate::math::Vec2;

/// A row-major RGBA32 texel buffer. Immutable after construction; owned by
/// the driver and borrowed by the rasterizer for the duration of a call.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl Texture {
    /// `texels` must have exactly `width * height` entries in RGBA32 byte
    /// order (R in the low byte). Panics if `width` or `height` is zero, or
    /// the buffer length doesn't match — both are caller contract
    /// violations, not runtime data errors.
    pub fn new(width: u32, height: u32, texels: Vec<u32>) -> Self {
        assert!(width > 0 && height > 0, "texture dimensions must be > 0");
        assert_eq!(
            texels.len(),
            (width * height) as usize,
            "texel buffer length must equal width * height"
        );
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> u32 {
        self.width * 4
    }

    /// Nearest-neighbor sample by normalized UV. Out-of-range UV is caller
    /// error for the low end (no clamping below zero is specified); the
    /// high end is clamped to the last row/column.
    pub fn sample(&self, uv: Vec2) -> u32 {
        let tx = ((uv.x * self.width as f32 + 0.5).floor() as i64).min(self.width as i64 - 1);
        let ty = ((uv.y * self.height as f32 + 0.5).floor() as i64).min(self.height as i64 - 1);
        self.texels[(tx as usize) + (ty as usize) * self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_nearest_texel_for_checkerboard() {
        // 2x2 checkerboard: black, white, white, black
        let tex = Texture::new(2, 2, vec![0xFF_00_00_00, 0xFF_FF_FF_FF, 0xFF_FF_FF_FF, 0xFF_00_00_00]);
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), 0xFF_00_00_00);
        assert_eq!(tex.sample(Vec2::new(0.99, 0.0)), 0xFF_FF_FF_FF);
    }

    #[test]
    fn clamps_high_edge_uv() {
        let tex = Texture::new(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), 4);
    }
}
