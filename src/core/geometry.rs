use nalgebra::{Point2, Point3, Vector2, Vector3, Vector4};

/// Attributes the vertex stage reads from a mesh vertex.
///
/// Only the position is mandatory. Vertex formats that carry no texture
/// coordinates, normals or tangents fall back to zero vectors, which the
/// shading stage treats like any other value.
pub trait VertexAttributes {
    fn position(&self) -> Point3<f32>;

    fn texcoord(&self) -> Vector2<f32> {
        Vector2::zeros()
    }

    fn normal(&self) -> Vector3<f32> {
        Vector3::zeros()
    }

    fn tangent(&self) -> Vector3<f32> {
        Vector3::zeros()
    }
}

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(
        position: Point3<f32>,
        texcoord: Vector2<f32>,
        normal: Vector3<f32>,
        tangent: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            texcoord,
            normal,
            tangent,
        }
    }
}

impl VertexAttributes for Vertex {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn texcoord(&self) -> Vector2<f32> {
        self.texcoord
    }

    fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    fn tangent(&self) -> Vector3<f32> {
        self.tangent
    }
}

impl VertexAttributes for Point3<f32> {
    fn position(&self) -> Point3<f32> {
        *self
    }
}

/// Output of the vertex stage, one per mesh vertex, rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedVertex {
    /// x, y, z after the perspective divide; w is the value before the divide.
    pub position: Vector4<f32>,
    pub texcoord: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// Normalized direction from the camera towards the world-space position.
    pub view_direction: Vector3<f32>,
}

impl TransformedVertex {
    /// Clip-space x and y, mapped to the given viewport with a top-left origin.
    pub fn screen_position(&self, width: f32, height: f32) -> Point2<f32> {
        Point2::new(
            (self.position.x + 1.0) * width / 2.0,
            (1.0 - self.position.y) * height / 2.0,
        )
    }

    /// True when the vertex lies inside the NDC cube (`x,y ∈ [-1,1]`, `z ∈ [0,1]`).
    pub fn in_view_volume(&self) -> bool {
        self.position.x.abs() <= 1.0
            && self.position.y.abs() <= 1.0
            && (0.0..=1.0).contains(&self.position.z)
    }
}

/// A covered pixel that passed the depth test, carrying interpolated attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    pub depth: f32,
    /// Perspective-correct interpolated clip w.
    pub w: f32,
    pub texcoord: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}
