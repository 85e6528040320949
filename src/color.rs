//! RGBA32 packing shared by the framebuffer, texture, and debug passes.

use crate::math::Vec3;

/// Clamp a `[0, 1]` channel value to `[0, 255]`, rounding to nearest.
#[inline]
fn clamp_channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Packs RGBA32 as `(a << 24) | (b << 16) | (g << 8) | r` (little-endian
/// byte order: R is the low byte).
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
}

/// Packs a linear `Vec3` color (each channel in `[0, 1]`) as opaque RGBA32.
#[inline]
pub fn pack_color(color: Vec3) -> u32 {
    pack_rgba(
        clamp_channel(color.x),
        clamp_channel(color.y),
        clamp_channel(color.z),
        255,
    )
}

/// Packs a single grayscale byte as opaque RGBA32 (used by the depth view).
#[inline]
pub fn pack_gray(v: u8) -> u32 {
    pack_rgba(v, v, v, 255)
}
