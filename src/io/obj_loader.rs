use crate::core::error::LoadError;
use crate::core::geometry::Vertex;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single vertex/index buffer pair.
///
/// OBJ is right-handed with a bottom-left texture origin; the result is
/// converted to the pipeline's conventions: z is negated, triangle winding is
/// reversed and `v` is flipped. Per-vertex tangents are derived from the UV
/// layout. All sub-models are merged.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<(Vec<Vertex>, Vec<u32>), LoadError> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Important: Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    // Materials come from the scene config, not the MTL file.
    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| LoadError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let index_offset = vertices.len() as u32;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() >= num_vertices * 3;
        let has_texcoords = mesh.texcoords.len() >= num_vertices * 2;
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, texcoord, normal, Vector3::zeros()));
        }

        // Flipping z mirrors the mesh, so swap each triangle's last two corners.
        for tri in mesh.indices.chunks_exact(3) {
            indices.extend([
                tri[0] + index_offset,
                tri[2] + index_offset,
                tri[1] + index_offset,
            ]);
        }
    }

    if vertices.is_empty() || indices.is_empty() {
        return Err(LoadError::EmptyObj(path.to_path_buf()));
    }

    compute_tangents(&mut vertices, &indices);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Ok((vertices, indices))
}

/// Accumulates per-triangle tangents from the UV gradients, then makes each
/// vertex tangent orthonormal to its normal.
///
/// Triangles with a degenerate UV mapping contribute nothing. Vertices left
/// without a usable tangent get an arbitrary one perpendicular to the normal.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::<f32>::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(v0), Some(v1), Some(v2)) = (vertices.get(i0), vertices.get(i1), vertices.get(i2))
        else {
            continue;
        };

        let edge0 = v1.position - v0.position;
        let edge1 = v2.position - v0.position;
        let duv0 = v1.texcoord - v0.texcoord;
        let duv1 = v2.texcoord - v0.texcoord;

        let det = duv0.x * duv1.y - duv1.x * duv0.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let tangent = (edge0 * duv1.y - edge1 * duv0.y) / det;

        accumulated[i0] += tangent;
        accumulated[i1] += tangent;
        accumulated[i2] += tangent;
    }

    for (vertex, tangent) in vertices.iter_mut().zip(accumulated) {
        let normal = vertex.normal;
        // Gram-Schmidt against the normal.
        let rejected = tangent - normal * normal.dot(&tangent);
        vertex.tangent = rejected
            .try_normalize(1e-8)
            .unwrap_or_else(|| perpendicular(&normal));
    }
}

fn perpendicular(normal: &Vector3<f32>) -> Vector3<f32> {
    let axis = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let candidate = axis - normal * normal.dot(&axis);
    candidate.try_normalize(1e-8).unwrap_or(axis)
}
