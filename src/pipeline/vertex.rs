use crate::core::geometry::{TransformedVertex, VertexAttributes};
use crate::core::math::transform::{apply_perspective_division, transform_point, transform_vector};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;

/// Maps every vertex of `mesh` into clip space and derives its shading
/// attributes. One output per input vertex, in the same order; nothing is
/// culled here.
///
/// Normals and tangents go through the world matrix directly, which is only
/// correct while the world transform is a rotation plus translation.
pub fn transform<V: VertexAttributes>(mesh: &Mesh<V>, camera: &Camera) -> Vec<TransformedVertex> {
    let world = mesh.world_matrix();
    let wvp = camera.projection_matrix() * camera.view_matrix() * world;

    mesh.vertices()
        .iter()
        .map(|vertex| {
            let position = vertex.position();
            let clip = wvp * position.to_homogeneous();
            let world_position = transform_point(&world, &position);

            TransformedVertex {
                position: apply_perspective_division(&clip),
                texcoord: vertex.texcoord(),
                normal: transform_vector(&world, &vertex.normal()),
                tangent: transform_vector(&world, &vertex.tangent()),
                view_direction: (world_position - camera.origin).normalize(),
            }
        })
        .collect()
}
