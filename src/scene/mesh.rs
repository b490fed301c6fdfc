use crate::core::error::DataError;
use crate::core::geometry::{Vertex, VertexAttributes};
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Effect;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// How the index buffer is grouped into triangles.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Consecutive index triples.
    #[default]
    List,
    /// Sliding window of three indices with alternating winding.
    Strip,
}

/// A collection of vertices and indices representing a 3D object, with its
/// own world transform and rendering effect.
#[derive(Debug, Clone)]
pub struct Mesh<V: VertexAttributes = Vertex> {
    vertices: Vec<V>,
    indices: Vec<u32>,
    pub topology: Topology,
    pub effect: Effect,
    pub position: Vector3<f32>,
    /// Current rotation around Y in `[0, 2π)`.
    pub angle: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    world_matrix: Matrix4<f32>,
}

impl<V: VertexAttributes> Mesh<V> {
    /// Builds a mesh, rejecting any index that does not name a vertex.
    pub fn new(
        vertices: Vec<V>,
        indices: Vec<u32>,
        topology: Topology,
        effect: Effect,
    ) -> Result<Self, DataError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(DataError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            indices,
            topology,
            effect,
            position: Vector3::zeros(),
            angle: 0.0,
            rotation_speed: FRAC_PI_2,
            world_matrix: Matrix4::identity(),
        })
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world_matrix
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.rebuild_world_matrix();
    }

    /// Advances the Y rotation by `delta_time` seconds and rebuilds the world matrix.
    pub fn update(&mut self, delta_time: f32) {
        self.angle = (self.angle + self.rotation_speed * delta_time).rem_euclid(TAU);
        self.rebuild_world_matrix();
    }

    fn rebuild_world_matrix(&mut self) {
        self.world_matrix =
            TransformFactory::translation(&self.position) * TransformFactory::rotation_y(self.angle);
    }
}

impl Mesh<Vertex> {
    /// Creates a single triangle facing -Z (towards a camera looking down +Z).
    pub fn create_test_triangle(effect: Effect) -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let tangent = Vector3::new(1.0, 0.0, 0.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 3.0, 0.0), Vector2::new(0.5, 0.0), normal, tangent),
            Vertex::new(Point3::new(3.0, -3.0, 0.0), Vector2::new(1.0, 1.0), normal, tangent),
            Vertex::new(Point3::new(-3.0, -3.0, 0.0), Vector2::new(0.0, 1.0), normal, tangent),
        ];

        Self {
            vertices,
            indices: vec![0, 1, 2],
            topology: Topology::List,
            effect,
            position: Vector3::zeros(),
            angle: 0.0,
            rotation_speed: FRAC_PI_2,
            world_matrix: Matrix4::identity(),
        }
    }
}
