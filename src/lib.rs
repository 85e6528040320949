//! A CPU software triangle rasterizer core: math kernel, indexed mesh
//! model, nearest-neighbor texture sampler, five-plane frustum clipper,
//! perspective-correct scanline rasterizer, and a reciprocal-w framebuffer.
//!
//! The crate never owns a window or a file; [`raster::rasterize`] fills a
//! caller-owned [`framebuffer::Framebuffer`] for one frame and returns.
//! Everything outside that (loading models, opening a window, driving a
//! frame loop) lives in the `swraster_demo` binary.

pub mod clip;
pub mod color;
pub mod debug;
pub mod framebuffer;
pub mod math;
pub mod mesh;
pub mod raster;
pub mod texture;

pub use framebuffer::Framebuffer;
pub use mesh::{Mesh, MeshError, Winding};
pub use raster::{rasterize, RenderMode};
pub use texture::Texture;
