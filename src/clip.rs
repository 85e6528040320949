//! Clips a transient triangle against the five canonical view-volume planes
//! (near, top, right, bottom, left), interpolating every per-vertex
//! attribute at the cut edges.

use arrayvec::ArrayVec;

use crate::math::{Vec2, Vec3};

/// Bound on the number of triangles a single input triangle can expand into
/// across all clip planes (five planes, at most doubling per plane).
pub const MAX_CLIP_TRIANGLES: usize = 32;

/// One corner of a transient (post-projection, pre-divide) triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
    /// Pre-divide `w` (stored as `-z_view`).
    pub w: f32,
}

impl ClipVertex {
    pub fn lerp(a: ClipVertex, b: ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            pos: a.pos + (b.pos - a.pos) * t,
            uv: a.uv + (b.uv - a.uv) * t,
            color: a.color + (b.color - a.color) * t,
            w: a.w + (b.w - a.w) * t,
        }
    }
}

/// A transient triangle flowing through the clipper.
#[derive(Debug, Clone, Copy)]
pub struct ClipTriangle {
    pub v: [ClipVertex; 3],
}

impl ClipTriangle {
    pub fn new(v: [ClipVertex; 3]) -> Self {
        Self { v }
    }
}

/// The five planes applied in order: near, top, right, bottom, left.
pub fn frustum_planes() -> [(Vec3, Vec3); 5] {
    [
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.5)),
        (Vec3::new(0.0, -1.0, 1.0), Vec3::ZERO),
        (Vec3::new(-1.0, 0.0, 1.0), Vec3::ZERO),
        (Vec3::new(0.0, 1.0, 1.0), Vec3::ZERO),
        (Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO),
    ]
}

/// Intersection parameter along the edge from `outside` to `inside`:
/// `t = (plane_d - dot(P0, normal)) / dot(P1 - P0, normal)`.
fn intersect(outside: ClipVertex, inside: ClipVertex, normal: Vec3, plane_d: f32) -> ClipVertex {
    let denom = (inside.pos - outside.pos).dot(normal);
    let t = (plane_d - outside.pos.dot(normal)) / denom;
    ClipVertex::lerp(outside, inside, t)
}

/// Signed test used to restore CW winding after clipping reduces a triangle
/// to one or two surviving corners.
fn needs_winding_swap(inside: Vec3, a: Vec3, b: Vec3) -> bool {
    (b - inside).cross(a - inside).dot(inside) > 0.0
}

/// Clips one triangle against a single half-space (`dot(normal, x) >=
/// dot(normal, plane_point)` is "inside"). Emits 0, 1, or 2 triangles.
pub fn clip_against_plane(
    tri: ClipTriangle,
    plane_normal: Vec3,
    plane_point: Vec3,
    out: &mut ArrayVec<ClipTriangle, MAX_CLIP_TRIANGLES>,
) {
    let normal = plane_normal.normalize();
    let plane_d = normal.dot(plane_point);

    let mut inside = ArrayVec::<ClipVertex, 3>::new();
    let mut outside = ArrayVec::<ClipVertex, 3>::new();
    for v in tri.v {
        if v.pos.dot(normal) >= plane_d {
            inside.push(v);
        } else {
            outside.push(v);
        }
    }

    match (inside.len(), outside.len()) {
        (0, _) => {}
        (3, 0) => {
            let _ = out.try_push(tri);
        }
        (1, 2) => {
            let in0 = inside[0];
            let mut a = intersect(outside[0], in0, normal, plane_d);
            let mut b = intersect(outside[1], in0, normal, plane_d);
            if needs_winding_swap(in0.pos, a.pos, b.pos) {
                std::mem::swap(&mut a, &mut b);
            }
            let _ = out.try_push(ClipTriangle::new([in0, b, a]));
        }
        (2, 1) => {
            let (in0, in1) = (inside[0], inside[1]);
            let mut a = intersect(outside[0], in0, normal, plane_d);
            let mut b = intersect(outside[0], in1, normal, plane_d);
            // Same winding-restoring test as the 1-inside case, applied to
            // the newly-cut edge shared by both emitted triangles.
            if needs_winding_swap(in0.pos, a.pos, b.pos) {
                std::mem::swap(&mut a, &mut b);
            }
            let _ = out.try_push(ClipTriangle::new([in0, in1, a]));
            let _ = out.try_push(ClipTriangle::new([in1, b, a]));
        }
        _ => unreachable!("triangle has exactly 3 vertices"),
    }
}

/// Drains `queue` through each plane in turn, feeding each plane's output
/// back in as the next plane's input.
pub fn clip_against_frustum(
    tri: ClipTriangle,
    planes: &[(Vec3, Vec3)],
) -> ArrayVec<ClipTriangle, MAX_CLIP_TRIANGLES> {
    let mut queue = ArrayVec::<ClipTriangle, MAX_CLIP_TRIANGLES>::new();
    let _ = queue.try_push(tri);

    for &(normal, point) in planes {
        let mut next = ArrayVec::<ClipTriangle, MAX_CLIP_TRIANGLES>::new();
        for t in queue.drain(..) {
            clip_against_plane(t, normal, point, &mut next);
        }
        queue = next;
    }

    queue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vtx(x: f32, y: f32, z: f32, w: f32) -> ClipVertex {
        ClipVertex {
            pos: Vec3::new(x, y, z),
            uv: Vec2::ZERO,
            color: Vec3::ZERO,
            w,
        }
    }

    #[test]
    fn fully_inside_triangle_survives_unchanged() {
        let tri = ClipTriangle::new([
            vtx(-0.1, -0.1, 0.6, 1.0),
            vtx(0.0, 0.1, 0.6, 1.0),
            vtx(0.1, -0.1, 0.6, 1.0),
        ]);
        let mut out = ArrayVec::new();
        clip_against_plane(tri, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.5), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn fully_outside_triangle_is_discarded() {
        let tri = ClipTriangle::new([
            vtx(-0.1, -0.1, 0.1, 1.0),
            vtx(0.0, 0.1, 0.1, 1.0),
            vtx(0.1, -0.1, 0.1, 1.0),
        ]);
        let mut out = ArrayVec::new();
        clip_against_plane(tri, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.5), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn near_plane_clip_of_one_vertex_emits_single_triangle_with_interpolated_attrs() {
        // One vertex behind the near plane (z=0.2 < 0.5), two in front.
        let mut v_out = vtx(0.0, 0.0, 0.2, 1.0);
        v_out.uv = Vec2::new(0.0, 0.0);
        let mut v_in0 = vtx(-0.5, -0.5, 0.8, 1.0);
        v_in0.uv = Vec2::new(0.0, 1.0);
        let mut v_in1 = vtx(0.5, -0.5, 0.8, 1.0);
        v_in1.uv = Vec2::new(1.0, 1.0);

        let tri = ClipTriangle::new([v_out, v_in0, v_in1]);
        let mut out = ArrayVec::new();
        clip_against_plane(tri, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.5), &mut out);
        assert_eq!(out.len(), 1);
        let emitted = out[0];
        for v in emitted.v {
            assert!(v.pos.z >= 0.5 - 1e-4);
        }
    }

    #[test]
    fn two_inside_one_outside_emits_two_triangles() {
        let v0 = vtx(-0.5, -0.5, 0.8, 1.0);
        let v1 = vtx(0.5, -0.5, 0.8, 1.0);
        let v2 = vtx(0.0, 0.5, 0.2, 1.0); // behind near plane
        let tri = ClipTriangle::new([v0, v1, v2]);
        let mut out = ArrayVec::new();
        clip_against_plane(tri, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.5), &mut out);
        assert_eq!(out.len(), 2);
        for t in &out {
            for v in t.v {
                assert!(v.pos.z >= 0.5 - 1e-4);
            }
        }
    }

    #[test]
    fn full_frustum_pipeline_bounds_queue_growth() {
        let tri = ClipTriangle::new([
            vtx(-0.1, -0.1, 0.6, 1.0),
            vtx(0.0, 0.1, 0.6, 1.0),
            vtx(0.1, -0.1, 0.6, 1.0),
        ]);
        let out = clip_against_frustum(tri, &frustum_planes());
        assert!(out.len() <= MAX_CLIP_TRIANGLES);
        assert_eq!(out.len(), 1);
    }
}
