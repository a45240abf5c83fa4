//! Live 3D preview of the mug
//!
//! The body mesh is uploaded once as macroquad meshes (split into chunks that
//! fit u16 indices) sharing one GPU texture. The texture is re-uploaded from
//! the surface whenever the surface reports a paint.

mod orbit;

pub use orbit::OrbitCamera;

use std::collections::HashMap;

use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;

use crate::compositor::TextureSurface;
use crate::model::{MeshVertex, MugMesh};
use crate::ui::Rect;

/// Most vertices a single macroquad mesh can address
const MAX_CHUNK_VERTICES: usize = u16::MAX as usize;

/// Direction the fixed preview light comes from
const LIGHT_DIR: [f32; 3] = [0.4, 0.8, 0.45];

/// A piece of the mesh small enough for u16 indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshChunk {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Split a mesh into chunks of at most `max_vertices` vertices each.
///
/// Triangles are never split across chunks; shared vertices are duplicated
/// when a triangle lands in a new chunk.
pub fn chunk_mesh(mesh: &MugMesh, max_vertices: usize) -> Vec<MeshChunk> {
    let max_vertices = max_vertices.clamp(3, MAX_CHUNK_VERTICES);
    let mut chunks = Vec::new();
    let mut current = MeshChunk::default();
    let mut remap: HashMap<u32, u16> = HashMap::new();

    for tri in mesh.indices.chunks_exact(3) {
        if tri.iter().any(|&i| i as usize >= mesh.vertices.len()) {
            continue;
        }
        let new_vertices = tri.iter().filter(|&&i| !remap.contains_key(&i)).count();
        if current.vertices.len() + new_vertices > max_vertices {
            chunks.push(std::mem::take(&mut current));
            remap.clear();
        }
        for &index in tri {
            let local = *remap.entry(index).or_insert_with(|| {
                current.vertices.push(mesh.vertices[index as usize]);
                (current.vertices.len() - 1) as u16
            });
            current.indices.push(local);
        }
    }
    if !current.indices.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Vertex brightness from a fixed directional light (0.55 ambient)
fn shade(normal: [f32; 3]) -> f32 {
    let n = Vec3::from_array(normal).normalize_or_zero();
    if n == Vec3::ZERO {
        return 1.0;
    }
    let l = Vec3::from_array(LIGHT_DIR).normalize();
    0.55 + 0.45 * n.dot(l).max(0.0)
}

fn to_gpu_mesh(chunk: &MeshChunk, texture: Option<Texture2D>) -> Mesh {
    let vertices = chunk
        .vertices
        .iter()
        .map(|v| {
            let s = shade(v.normal);
            Vertex::new2(Vec3::from_array(v.position), Vec2::from_array(v.uv), Color::new(s, s, s, 1.0))
        })
        .collect();
    Mesh {
        vertices,
        indices: chunk.indices.clone(),
        texture,
    }
}

fn surface_size(surface: &TextureSurface) -> Option<(u16, u16)> {
    let w = u16::try_from(surface.width()).ok()?;
    let h = u16::try_from(surface.height()).ok()?;
    Some((w, h))
}

/// GPU-side mug: meshes, texture and the orbit camera looking at them
pub struct LivePreview {
    meshes: Vec<Mesh>,
    texture: Option<Texture2D>,
    pub camera: OrbitCamera,
}

impl LivePreview {
    pub fn new(mesh: &MugMesh, surface: Option<&TextureSurface>) -> Self {
        let texture = surface.and_then(|surface| {
            let Some((w, h)) = surface_size(surface) else {
                log::warn!("Texture {}x{} is too large to preview", surface.width(), surface.height());
                return None;
            };
            let texture = Texture2D::from_rgba8(w, h, surface.as_rgba());
            texture.set_filter(FilterMode::Linear);
            Some(texture)
        });

        let chunks = chunk_mesh(mesh, MAX_CHUNK_VERTICES);
        log::debug!("Preview mesh uploaded in {} chunk(s)", chunks.len());
        let meshes = chunks.iter().map(|c| to_gpu_mesh(c, texture.clone())).collect();

        Self {
            meshes,
            texture,
            camera: OrbitCamera::default(),
        }
    }

    /// Re-upload the texture if the surface was painted since last frame
    pub fn sync(&mut self, surface: &mut TextureSurface) {
        if !surface.take_dirty() {
            return;
        }
        let (Some(texture), Some((width, height))) = (&self.texture, surface_size(surface)) else {
            return;
        };
        let image = Image {
            bytes: surface.as_rgba().to_vec(),
            width,
            height,
        };
        texture.update(&image);
    }

    /// Draw the mug into `rect` (screen pixels)
    pub fn draw(&self, rect: Rect) {
        if rect.w < 1.0 || rect.h < 1.0 {
            return;
        }
        // GL viewport origin is bottom-left
        let viewport_y = screen_height() - rect.bottom();
        set_camera(&Camera3D {
            position: self.camera.eye(),
            target: self.camera.target,
            up: Vec3::Y,
            fovy: 45f32.to_radians(),
            aspect: Some(rect.w / rect.h),
            viewport: Some((rect.x as i32, viewport_y as i32, rect.w as i32, rect.h as i32)),
            ..Default::default()
        });

        for mesh in &self.meshes {
            draw_mesh(mesh);
        }

        set_default_camera();
    }
}
