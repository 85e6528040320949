//! Demo driver: loads an OBJ model (or a built-in triangle), opens a
//! `minifb` window, and rasterizes one frame per iteration.
//!
//! Everything here is a client of the `swraster` library, not part of it:
//! model loading, texture decoding, the window, and the frame loop.

use std::env;
use std::fs::File;
use std::io::BufReader;

use log::{info, warn};
use minifb::{Key, Window, WindowOptions};
use obj::{load_obj, Obj, TexturedVertex};

use swraster::math::{Mat4, Vec2, Vec3};
use swraster::{rasterize, Framebuffer, Mesh, RenderMode, Texture, Winding};

const WIN_WIDTH: usize = 800;
const WIN_HEIGHT: usize = 600;
const FPS: usize = 60;

fn load_model_from_file(file_name: &str) -> Option<Mesh> {
    let f = match File::open(file_name) {
        Ok(f) => f,
        Err(e) => {
            warn!("could not open model file {file_name}: {e}");
            return None;
        }
    };

    let input = BufReader::new(f);
    let obj: Obj<TexturedVertex, u32> = match load_obj(input) {
        Ok(obj) => obj,
        Err(e) => {
            warn!("could not parse OBJ file {file_name}: {e}");
            return None;
        }
    };

    let positions = obj
        .vertices
        .iter()
        .map(|v| Vec3::new(v.position[0], v.position[1], v.position[2]))
        .collect();
    let uvs = obj
        .vertices
        .iter()
        .map(|v| Vec2::new(v.texture[0], v.texture[1]))
        .collect();
    let vert_indices: Vec<u32> = obj.indices.clone();
    let uv_indices = vert_indices.clone();

    match Mesh::new(
        Winding::Ccw,
        positions,
        vec![],
        vert_indices,
        uvs,
        uv_indices,
        vec![],
        vec![],
    ) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            warn!("OBJ file {file_name} did not produce a valid mesh: {e}");
            None
        }
    }
}

fn load_texture(file_name: &str) -> Option<Texture> {
    let img = match image::open(file_name) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("could not decode texture {file_name}: {e}");
            return None;
        }
    };
    let (width, height) = (img.width(), img.height());
    let texels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
        })
        .collect();
    Some(Texture::new(width, height, texels))
}

/// A single upward-facing RGB triangle, used when no OBJ file is given.
fn default_model() -> Mesh {
    let side = 1.0_f32;
    Mesh::new(
        Winding::Cw,
        vec![
            Vec3::new(0.0, side, -3.0),
            Vec3::new(-side / 2.0, 0.0, -3.0),
            Vec3::new(side / 2.0, 0.0, -3.0),
        ],
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![0, 1, 2],
        vec![],
        vec![],
        vec![],
        vec![],
    )
    .expect("default model is internally consistent")
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let model_path = args.get(1);
    let texture_path = args.get(2);
    let mode_arg = args.get(3).map(String::as_str);

    let mesh = model_path
        .and_then(|p| load_model_from_file(p))
        .unwrap_or_else(|| {
            info!("no usable model file given, loading the built-in triangle");
            default_model()
        });

    let texture = texture_path.and_then(|p| load_texture(p));

    let mut fb = Framebuffer::new(WIN_WIDTH as u32, WIN_HEIGHT as u32);
    let mut window = Window::new(
        "swraster demo - ESC to exit",
        WIN_WIDTH,
        WIN_HEIGHT,
        WindowOptions::default(),
    )
    .unwrap_or_else(|e| panic!("failed to open window: {e}"));
    window.set_target_fps(FPS);
    info!("window opened at {WIN_WIDTH}x{WIN_HEIGHT}, {FPS} fps target");

    let aspect = WIN_WIDTH as f32 / WIN_HEIGHT as f32;
    let proj = Mat4::perspective(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0);
    let view = Mat4::look_at(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, 0.0),
    );

    let mut angle = 0.0_f32;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        fb.clear(0, 0.0);

        let model = Mat4::rotation(0.0, 0.0, angle);
        // Row-vector convention (`Mat4::mul_vec4` is `v * M`): the leftmost
        // factor in a product is applied first, so model must lead view.
        // `rasterize` expects view-space positions and a pure projection
        // matrix (its cull test and pre-divide `w` are derived straight
        // from the mesh it's handed), so model+view is applied here, to a
        // fresh mesh, rather than folded into the matrix passed to it.
        let view_space_mesh = mesh.transformed(&(model * view));

        let mode = match (mode_arg, &texture) {
            (Some("wireframe"), _) => RenderMode::Wireframe,
            (Some("depth"), _) => RenderMode::Depth,
            (Some("textured"), Some(tex)) => RenderMode::Textured(tex),
            _ => RenderMode::Color,
        };

        rasterize(&mut fb, &view_space_mesh, &proj, mode);

        window
            .update_with_buffer(&fb.blit_to_display(), WIN_WIDTH, WIN_HEIGHT)
            .unwrap();

        angle += 0.01;
    }
}
