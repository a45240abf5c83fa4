//! glTF/GLB loading for the mug asset

use std::path::Path;

use gltf::image::Format;
use gltf::mesh::Mode;
use image::RgbaImage;
use macroquad::math::{Mat4, Vec3};

use super::{MeshVertex, ModelError, MugMesh, MugModel};

/// Load the mug from a `.glb`/`.gltf` file, keeping only the mesh named `mesh_name`
pub fn load_model<P: AsRef<Path>>(path: P, mesh_name: &str) -> Result<MugModel, ModelError> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| ModelError::Gltf(format!("{}: {}", path.display(), e)))?;
    extract(&document, &buffers, &images, mesh_name)
}

fn extract(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    mesh_name: &str,
) -> Result<MugModel, ModelError> {
    let (mesh, transform) = find_mesh(document, mesh_name)
        .ok_or_else(|| ModelError::MeshNotFound(mesh_name.to_string()))?;

    let normal_matrix = transform.inverse().transpose();
    let mut out = MugMesh::default();
    let mut base_texture = None;

    for primitive in mesh.primitives() {
        let base_color = primitive.material().pbr_metallic_roughness().base_color_texture();
        let tex_coord_set = base_color.as_ref().map(|info| info.tex_coord()).unwrap_or(0);

        if base_texture.is_none() {
            if let Some(info) = &base_color {
                let index = info.texture().source().index();
                if let Some(data) = images.get(index) {
                    base_texture = Some(to_rgba_image(data)?);
                }
            }
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|n| n.collect())
            .unwrap_or_default();
        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(tex_coord_set)
            .map(|t| t.into_f32().collect())
            .unwrap_or_default();

        let local_indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let triangles = triangulate(primitive.mode(), &local_indices);
        if triangles.is_empty() {
            continue;
        }

        let offset = out.vertices.len() as u32;
        for (i, pos) in positions.iter().enumerate() {
            let world = transform.transform_point3(Vec3::from_array(*pos));
            let normal = normals
                .get(i)
                .map(|n| normal_matrix.transform_vector3(Vec3::from_array(*n)).normalize_or_zero())
                .unwrap_or(Vec3::ZERO);
            out.vertices.push(MeshVertex {
                position: world.to_array(),
                normal: normal.to_array(),
                uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            });
        }

        let vertex_count = positions.len() as u32;
        for tri in triangles.chunks_exact(3) {
            // Skip triangles with dangling indices
            if tri.iter().all(|&i| i < vertex_count) {
                out.indices.extend(tri.iter().map(|&i| i + offset));
            }
        }
    }

    if out.is_empty() {
        return Err(ModelError::NoTriangles(mesh_name.to_string()));
    }

    Ok(MugModel {
        mesh: out,
        base_texture,
        flip_y: false,
    })
}

/// Find the mesh to paint and its accumulated scene transform.
///
/// A node named `name` wins; failing that, a node whose mesh is named `name`.
fn find_mesh<'a>(document: &'a gltf::Document, name: &str) -> Option<(gltf::Mesh<'a>, Mat4)> {
    let mut by_node = None;
    let mut by_mesh = None;

    for scene in document.scenes() {
        for node in scene.nodes() {
            visit(node, Mat4::IDENTITY, name, &mut by_node, &mut by_mesh);
        }
    }

    by_node.or(by_mesh)
}

fn visit<'a>(
    node: gltf::Node<'a>,
    parent: Mat4,
    name: &str,
    by_node: &mut Option<(gltf::Mesh<'a>, Mat4)>,
    by_mesh: &mut Option<(gltf::Mesh<'a>, Mat4)>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        if by_node.is_none() && node.name() == Some(name) {
            *by_node = Some((mesh.clone(), world));
        }
        if by_mesh.is_none() && mesh.name() == Some(name) {
            *by_mesh = Some((mesh, world));
        }
    }

    for child in node.children() {
        visit(child, world, name, by_node, by_mesh);
    }
}

/// Expand strips and fans into a plain triangle list
fn triangulate(mode: Mode, indices: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(indices.len());
    match mode {
        Mode::Triangles => {
            for chunk in indices.chunks_exact(3) {
                out.extend_from_slice(chunk);
            }
        }
        Mode::TriangleStrip => {
            for i in 0..indices.len().saturating_sub(2) {
                if i % 2 == 0 {
                    out.extend_from_slice(&[indices[i], indices[i + 1], indices[i + 2]]);
                } else {
                    // Odd triangles flip winding
                    out.extend_from_slice(&[indices[i], indices[i + 2], indices[i + 1]]);
                }
            }
        }
        Mode::TriangleFan => {
            for i in 1..indices.len().saturating_sub(1) {
                out.extend_from_slice(&[indices[0], indices[i], indices[i + 1]]);
            }
        }
        // Points and lines have nothing to paint
        _ => {}
    }
    out
}

/// Convert decoded glTF image data to RGBA8
fn to_rgba_image(data: &gltf::image::Data) -> Result<RgbaImage, ModelError> {
    let rgba: Vec<u8> = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => return Err(ModelError::UnsupportedImage(format!("{:?}", other))),
    };

    RgbaImage::from_raw(data.width, data.height, rgba).ok_or_else(|| {
        ModelError::UnsupportedImage(format!(
            "pixel data does not match {}x{}",
            data.width, data.height
        ))
    })
}
