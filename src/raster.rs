//! Transforms a mesh's triangles into framebuffer writes: back-face cull,
//! flat shading, clip, perspective divide, viewport map, scanline fill with
//! perspective-correct attribute interpolation and a reciprocal-w depth test.

use log::trace;

use crate::clip::{clip_against_frustum, frustum_planes, ClipTriangle, ClipVertex};
use crate::color::pack_color;
use crate::debug::{draw_line, visualize_depth};
use crate::framebuffer::Framebuffer;
use crate::math::{approx_eq, Mat4, Vec2, Vec3};
use crate::mesh::Mesh;
use crate::texture::Texture;

/// Selects both the shading source and the debug visualization for a call
/// to [`rasterize`]. Folds spec's separate "color vs. texture" input and
/// "display mode" switch into one tagged selector, since the two always
/// travel together at a call site.
pub enum RenderMode<'a> {
    /// Flat-shaded per-vertex color, interpolated perspective-correctly.
    Color,
    /// Perspective-correct UV interpolation, nearest-neighbor texture sample.
    Textured(&'a Texture),
    /// Three Bresenham lines per surviving triangle, no fill.
    Wireframe,
    /// Fills and depth-tests normally, then overwrites every pixel with the
    /// gamma-decoded reciprocal-w value (spec's depth view).
    Depth,
}

/// Signed area (twice the triangle's area) of `(a, b, c)` in 2D. Shared by
/// the degenerate-triangle check and the per-pixel edge functions.
#[inline]
fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Top-left fill rule: an edge exactly on a pixel center is covered only if
/// it is a "top" edge (horizontal, pointing left to right) or a "left" edge
/// (pointing upward), so shared edges between adjacent triangles are never
/// double-filled.
#[inline]
fn is_top_left(edge_vec: Vec2) -> bool {
    (approx_eq(edge_vec.y, 0.0) && edge_vec.x > 0.0) || edge_vec.y > 0.0
}

#[inline]
fn covered(e: f32, edge_vec: Vec2) -> bool {
    if approx_eq(e, 0.0) {
        is_top_left(edge_vec)
    } else {
        e > 0.0
    }
}

/// Rasterizes every surviving triangle of `mesh` into `fb` under the given
/// `projection` matrix and `mode`. `fb`'s existing contents (from a prior
/// `clear()`) are depth-tested against, not implicitly cleared.
///
/// `mesh`'s positions must already be in view space (camera at the origin
/// looking down -Z) — the driver is expected to have applied its model and
/// view transforms first, e.g. via `Mesh::transformed`. `projection` must be
/// a pure projection matrix: the back-face cull test and the pre-divide `w`
/// below are both derived directly from `mesh`'s positions, so folding a
/// model/view transform into `projection` instead would leave the cull test
/// and `w` computed in the wrong space while only the clip position reflects
/// the full transform.
pub fn rasterize(fb: &mut Framebuffer, mesh: &Mesh, projection: &Mat4, mode: RenderMode) {
    let light_dir = Vec3::new(0.0, -1.0, -1.0).normalize();
    let planes = frustum_planes();

    for face in 0..mesh.triangle_count() {
        let idx = [
            mesh.vert_indices[face * 3] as usize,
            mesh.vert_indices[face * 3 + 1] as usize,
            mesh.vert_indices[face * 3 + 2] as usize,
        ];
        let p = [
            mesh.positions[idx[0]],
            mesh.positions[idx[1]],
            mesh.positions[idx[2]],
        ];

        let normal = (p[2] - p[0]).cross(p[1] - p[0]).normalize();
        if p[0].dot(normal) > 0.0 {
            trace!("face {face}: back-face culled");
            continue;
        }

        let shade = (-light_dir.dot(normal)).max(0.0);

        let base_colors = if mesh.colors.is_empty() {
            [Vec3::new(1.0, 1.0, 1.0); 3]
        } else {
            [
                mesh.colors[face * 3],
                mesh.colors[face * 3 + 1],
                mesh.colors[face * 3 + 2],
            ]
        };
        let colors = [
            base_colors[0] * shade,
            base_colors[1] * shade,
            base_colors[2] * shade,
        ];

        let uvs = if mesh.uv_indices.is_empty() {
            [Vec2::ZERO; 3]
        } else {
            [
                mesh.uvs[mesh.uv_indices[face * 3] as usize],
                mesh.uvs[mesh.uv_indices[face * 3 + 1] as usize],
                mesh.uvs[mesh.uv_indices[face * 3 + 2] as usize],
            ]
        };

        // w is tracked as -z_view, separately from the clip-space position;
        // transform_vector leaves it undivided so the clipper can interpolate
        // it like any other attribute.
        let ws = [-p[0].z, -p[1].z, -p[2].z];
        let clip_pos = [
            projection.transform_vector(p[0]),
            projection.transform_vector(p[1]),
            projection.transform_vector(p[2]),
        ];

        let tri = ClipTriangle::new([
            ClipVertex {
                pos: clip_pos[0],
                uv: uvs[0],
                color: colors[0],
                w: ws[0],
            },
            ClipVertex {
                pos: clip_pos[1],
                uv: uvs[1],
                color: colors[1],
                w: ws[1],
            },
            ClipVertex {
                pos: clip_pos[2],
                uv: uvs[2],
                color: colors[2],
                w: ws[2],
            },
        ]);

        let clipped = clip_against_frustum(tri, &planes);
        if clipped.is_empty() {
            trace!("face {face}: fully clipped");
        }

        for out_tri in &clipped {
            rasterize_clipped_triangle(fb, out_tri, &mode);
        }
    }

    if matches!(mode, RenderMode::Depth) {
        visualize_depth(fb);
    }
}

/// Perspective-divides, viewport-maps, and fills (or outlines) one clipped
/// triangle.
fn rasterize_clipped_triangle(fb: &mut Framebuffer, tri: &ClipTriangle, mode: &RenderMode) {
    let w = fb.width();
    let h = fb.height();

    let ndc: [Vec3; 3] = std::array::from_fn(|i| {
        let v = tri.v[i];
        let inv_w = 1.0 / v.w;
        Vec3::new(v.pos.x * inv_w, v.pos.y * inv_w, v.pos.z * inv_w)
    });
    let raster: [Vec2; 3] = std::array::from_fn(|i| {
        Vec2::new(
            (ndc[i].x + 1.0) * w as f32 / 2.0,
            (ndc[i].y + 1.0) * h as f32 / 2.0,
        )
    });

    if matches!(mode, RenderMode::Wireframe) {
        for i in 0..3 {
            let a = raster[i];
            let b = raster[(i + 1) % 3];
            draw_line(fb, a.x as i32, a.y as i32, b.x as i32, b.y as i32, 0xFFFFFFFF);
        }
        return;
    }

    let a2 = edge(raster[0], raster[1], raster[2]);
    if approx_eq(a2, 0.0) {
        return; // degenerate after projection
    }

    let min_x = raster.iter().map(|v| v.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
    let max_x = raster
        .iter()
        .map(|v| v.x)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil()
        .min(w as f32 - 1.0) as i32;
    let min_y = raster.iter().map(|v| v.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
    let max_y = raster
        .iter()
        .map(|v| v.y)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil()
        .min(h as f32 - 1.0) as i32;

    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let e12 = edge(raster[1], raster[2], pixel);
            let e20 = edge(raster[2], raster[0], pixel);
            let e01 = edge(raster[0], raster[1], pixel);

            if !covered(e12, raster[2] - raster[1])
                || !covered(e20, raster[0] - raster[2])
                || !covered(e01, raster[1] - raster[0])
            {
                continue;
            }

            let t0 = e12 / a2;
            let t1 = e20 / a2;
            let t2 = e01 / a2;

            let (w0, w1, w2) = (tri.v[0].w, tri.v[1].w, tri.v[2].w);
            let oow = t0 / w0 + t1 / w1 + t2 / w2;

            if oow <= fb.depth_at(x as u32, y as u32) {
                continue;
            }

            match mode {
                RenderMode::Color => {
                    let c = (t0 / w0) * tri.v[0].color
                        + (t1 / w1) * tri.v[1].color
                        + (t2 / w2) * tri.v[2].color;
                    let color = pack_color(c * (1.0 / oow));
                    fb.write(x as u32, y as u32, color, oow);
                }
                RenderMode::Textured(texture) => {
                    let uv = (t0 / w0) * tri.v[0].uv
                        + (t1 / w1) * tri.v[1].uv
                        + (t2 / w2) * tri.v[2].uv;
                    let uv = uv * (1.0 / oow);
                    fb.write(x as u32, y as u32, texture_sample(texture, uv), oow);
                }
                RenderMode::Depth => {
                    // Color doesn't matter here; visualize_depth overwrites
                    // every pixel from the depth buffer after the full pass.
                    fb.write(x as u32, y as u32, 0, oow);
                }
                RenderMode::Wireframe => unreachable!("handled above"),
            }
        }
    }
}

#[inline]
fn texture_sample(texture: &Texture, uv: Vec2) -> u32 {
    texture.sample(uv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Winding;

    fn single_triangle_mesh(colors: Vec<Vec3>) -> Mesh {
        Mesh::new(
            Winding::Cw,
            vec![
                Vec3::new(-0.5, -0.5, -1.0),
                Vec3::new(0.0, 0.5, -1.0),
                Vec3::new(0.5, -0.5, -1.0),
            ],
            colors,
            vec![0, 1, 2],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap()
    }

    fn identity_ortho_like_projection() -> Mat4 {
        // Shallow perspective matrix that keeps a unit-scale triangle near
        // the center of the viewport for a predictable fill test.
        Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
    }

    #[test]
    fn color_mode_fills_triangle_interior_and_leaves_corners_untouched() {
        let mesh = single_triangle_mesh(vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]);
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(0, 0.0);
        let proj = identity_ortho_like_projection();
        rasterize(&mut fb, &mesh, &proj, RenderMode::Color);

        let center = 32 + 32 * 64;
        assert_ne!(fb.pixels()[center], 0);
        // A corner far outside the projected triangle stays cleared.
        assert_eq!(fb.pixels()[0], 0);
    }

    #[test]
    fn back_facing_triangle_is_culled() {
        // Same three positions as the other tests, but stored already in
        // the winding that faces away from a camera at the origin looking
        // down -Z, so construction leaves the index order untouched.
        let mesh = Mesh::new(
            Winding::Cw,
            vec![
                Vec3::new(-0.5, -0.5, -1.0),
                Vec3::new(0.0, 0.5, -1.0),
                Vec3::new(0.5, -0.5, -1.0),
            ],
            vec![],
            vec![0, 2, 1],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(0, 0.0);
        let proj = identity_ortho_like_projection();
        rasterize(&mut fb, &mesh, &proj, RenderMode::Color);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn culling_responds_to_a_driver_applied_model_transform() {
        // Same front-facing triangle as the fill test, but mirrored on X via
        // `Mesh::transformed` before rasterizing (as a driver applying a
        // model matrix would). The mirror flips its winding as the camera
        // sees it without moving it behind the camera, so it must now be
        // culled — proving the cull test reads the already-transformed
        // positions handed to `rasterize`, not a stale untransformed copy.
        let mesh = single_triangle_mesh(vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]);
        let mirrored = mesh.transformed(&Mat4::scale(-1.0, 1.0, 1.0));

        let mut fb = Framebuffer::new(64, 64);
        fb.clear(0, 0.0);
        let proj = identity_ortho_like_projection();
        rasterize(&mut fb, &mirrored, &proj, RenderMode::Color);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn depth_mode_overwrites_every_pixel_with_grayscale() {
        let mesh = single_triangle_mesh(vec![]);
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(0, 0.0);
        let proj = identity_ortho_like_projection();
        rasterize(&mut fb, &mesh, &proj, RenderMode::Depth);
        for &pixel in fb.pixels() {
            let r = pixel & 0xFF;
            let g = (pixel >> 8) & 0xFF;
            let b = (pixel >> 16) & 0xFF;
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn wireframe_mode_never_fills_the_interior() {
        let mesh = single_triangle_mesh(vec![]);
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(0, 0.0);
        let proj = identity_ortho_like_projection();
        rasterize(&mut fb, &mesh, &proj, RenderMode::Wireframe);
        let center = 32 + 32 * 64;
        assert_eq!(fb.pixels()[center], 0);
    }
}
