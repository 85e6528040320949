//! Fixed-size vector and matrix math used throughout the rasterizer.
//!
//! Coordinate conventions are right-handed, camera looking down -Z; clip
//! space has z in [0, 1] (reverse of OpenGL); NDC y is up.

mod matrix;
mod vector;

pub use matrix::{Mat3, Mat4};
pub use vector::{Vec2, Vec3, Vec4};

/// Absolute epsilon for the shared float comparator.
pub const EPS_ABS: f32 = 1e-5;
/// Relative epsilon for the shared float comparator.
pub const EPS_REL: f32 = 1e-5;

/// The one shared floating-point comparator used across the crate: absolute
/// difference within `EPS_ABS`, else a relative bound scaled by the larger
/// magnitude. No call site should invent its own tolerance.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    let diff = (a - b).abs();
    if diff <= EPS_ABS {
        return true;
    }
    diff <= EPS_REL * a.abs().max(b.abs())
}
