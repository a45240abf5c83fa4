//! Mug model loading
//!
//! Loads the mug asset (glTF/GLB), finds the paintable body mesh by name and
//! pulls out its geometry plus the base-color image that seeds the texture
//! surface.

mod gltf_loader;

pub use gltf_loader::load_model;

use image::RgbaImage;
use std::fmt;

/// Default name of the paintable sub-mesh in the mug asset
pub const DEFAULT_MESH_NAME: &str = "MugBody";

/// A vertex of the mug body, already in model (scene) space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle mesh of the paintable body
#[derive(Debug, Clone, Default)]
pub struct MugMesh {
    pub vertices: Vec<MeshVertex>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
}

impl MugMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The loaded mug: body geometry plus its original texture, if it has one
#[derive(Debug, Clone)]
pub struct MugModel {
    pub mesh: MugMesh,
    /// Decoded base-color image of the body's material
    pub base_texture: Option<RgbaImage>,
    /// glTF UVs address the first image row at v = 0, so no vertical flip
    pub flip_y: bool,
}

/// Error type for model loading
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The asset could not be read or parsed
    Gltf(String),
    /// No node or mesh carries the requested name
    MeshNotFound(String),
    /// The named mesh has no triangle primitives
    NoTriangles(String),
    /// The base-color image uses a pixel format we cannot convert
    UnsupportedImage(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Gltf(msg) => write!(f, "glTF error: {}", msg),
            ModelError::MeshNotFound(name) => write!(f, "mesh '{}' not found", name),
            ModelError::NoTriangles(name) => write!(f, "mesh '{}' has no triangles", name),
            ModelError::UnsupportedImage(msg) => write!(f, "unsupported texture image: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

