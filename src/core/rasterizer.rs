use crate::core::color::WHITE;
use crate::core::error::DataError;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{Fragment, TransformedVertex, VertexAttributes};
use crate::core::math::interpolation::{
    barycentric_weights, interpolate_reciprocal, perspective_correct, remap, signed_area,
};
use crate::core::pipeline::{CullMode, Visualization};
use crate::scene::camera::Camera;
use crate::scene::mesh::{Mesh, Topology};
use nalgebra::{Point2, Vector3};

/// Depth range stretched over the full gray ramp in depth visualization.
const DEPTH_VIS_MIN: f32 = 0.997;
const DEPTH_VIS_MAX: f32 = 1.0;

/// The Rasterizer turns transformed vertices into depth-tested fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
    pub visualization: Visualization,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterates the triangles of an index buffer according to its topology.
///
/// Strip windows alternate winding (odd windows swap the last two indices) and
/// windows naming the same vertex twice are skipped.
pub fn assemble_triangles(
    indices: &[u32],
    topology: Topology,
) -> impl Iterator<Item = [u32; 3]> + '_ {
    let step = match topology {
        Topology::List => 3,
        Topology::Strip => 1,
    };

    (0..indices.len().saturating_sub(2))
        .step_by(step)
        .filter_map(move |i| {
            let (i0, i1, i2) = (indices[i], indices[i + 1], indices[i + 2]);
            match topology {
                Topology::List => Some([i0, i1, i2]),
                Topology::Strip => {
                    if i0 == i1 || i1 == i2 || i2 == i0 {
                        None
                    } else if i % 2 == 0 {
                        Some([i0, i1, i2])
                    } else {
                        Some([i0, i2, i1])
                    }
                }
            }
        })
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            visualization: Visualization::Shaded,
        }
    }

    /// Rasterizes every triangle of `mesh` against the frame buffer.
    ///
    /// Depth is tested and written here; the returned fragments are exactly the
    /// pixels that passed, in rasterization order. In a visualization mode the
    /// debug colors are written straight into the frame buffer and no fragments
    /// are returned.
    ///
    /// Triangles with any vertex outside the NDC cube are dropped whole; there
    /// is no clipping.
    pub fn rasterize<V: VertexAttributes>(
        &self,
        mesh: &Mesh<V>,
        vertices: &[TransformedVertex],
        camera: &Camera,
        framebuffer: &mut FrameBuffer,
    ) -> Result<Vec<Fragment>, DataError> {
        let mut fragments = Vec::new();

        for triangle in assemble_triangles(mesh.indices(), mesh.topology) {
            let fetch = |index: u32| {
                vertices
                    .get(index as usize)
                    .ok_or(DataError::IndexOutOfRange {
                        index,
                        vertex_count: vertices.len(),
                    })
            };
            let tri = [fetch(triangle[0])?, fetch(triangle[1])?, fetch(triangle[2])?];

            // 1. Trivial reject
            if !tri.iter().all(|v| v.in_view_volume()) {
                continue;
            }

            // 2. Face culling
            if self.is_culled(&tri, &camera.forward) {
                continue;
            }

            self.rasterize_triangle(&tri, framebuffer, &mut fragments);
        }

        Ok(fragments)
    }

    /// Culls on the average world-space normal against the camera's forward axis.
    pub fn is_culled(&self, tri: &[&TransformedVertex; 3], forward: &Vector3<f32>) -> bool {
        let facing = ((tri[0].normal + tri[1].normal + tri[2].normal) / 3.0).dot(forward);
        match self.cull_mode {
            CullMode::Back => facing > 0.0,
            CullMode::Front => facing < 0.0,
            CullMode::None => false,
        }
    }

    fn rasterize_triangle(
        &self,
        tri: &[&TransformedVertex; 3],
        framebuffer: &mut FrameBuffer,
        fragments: &mut Vec<Fragment>,
    ) {
        if framebuffer.width == 0 || framebuffer.height == 0 {
            return;
        }
        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;

        // 3. Screen mapping
        let screen = [
            tri[0].screen_position(width, height),
            tri[1].screen_position(width, height),
            tri[2].screen_position(width, height),
        ];

        // 4. Bounding box
        let (min_x, min_y, max_x, max_y) = compute_bounding_box(&screen, framebuffer);

        if self.visualization == Visualization::BoundingBoxes {
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    framebuffer.set_pixel(x, y, WHITE);
                }
            }
            return;
        }

        if signed_area(screen[0], screen[1], screen[2]).abs() < f32::EPSILON {
            return;
        }

        let depths = [tri[0].position.z, tri[1].position.z, tri[2].position.z];
        let ws = [tri[0].position.w, tri[1].position.w, tri[2].position.w];

        // 5. Scan conversion
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let pixel = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(weights) = barycentric_weights(pixel, screen[0], screen[1], screen[2])
                else {
                    continue;
                };

                // 6. Depth test
                let depth = interpolate_reciprocal(weights, depths);
                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                if self.visualization == Visualization::DepthBuffer {
                    let gray = remap(depth, DEPTH_VIS_MIN, DEPTH_VIS_MAX).clamp(0.0, 1.0);
                    framebuffer.set_pixel(x, y, Vector3::repeat(gray));
                    continue;
                }

                // 7. Perspective-correct attributes
                fragments.push(interpolate_fragment(x, y, depth, weights, tri, ws));
            }
        }
    }
}

/// Integer pixel bounds of the screen-space triangle, clamped to the buffer.
fn compute_bounding_box(
    points: &[Point2<f32>; 3],
    framebuffer: &FrameBuffer,
) -> (usize, usize, usize, usize) {
    let clamp_x = |v: f32| (v.max(0.0) as usize).min(framebuffer.width - 1);
    let clamp_y = |v: f32| (v.max(0.0) as usize).min(framebuffer.height - 1);

    let min_x = clamp_x(points[0].x.min(points[1].x).min(points[2].x));
    let min_y = clamp_y(points[0].y.min(points[1].y).min(points[2].y));
    let max_x = clamp_x(points[0].x.max(points[1].x).max(points[2].x));
    let max_y = clamp_y(points[0].y.max(points[1].y).max(points[2].y));
    (min_x, min_y, max_x, max_y)
}

/// Builds the fragment for barycentric `weights` over the triangle `tri`.
///
/// `ws` are the vertices' pre-divide clip w values. Normal, tangent and view
/// direction are re-normalized.
pub fn interpolate_fragment(
    x: usize,
    y: usize,
    depth: f32,
    weights: Vector3<f32>,
    tri: &[&TransformedVertex; 3],
    ws: [f32; 3],
) -> Fragment {
    let w = interpolate_reciprocal(weights, ws);

    let texcoord = perspective_correct(
        weights,
        [tri[0].texcoord, tri[1].texcoord, tri[2].texcoord],
        ws,
        w,
    );
    let normal = perspective_correct(weights, [tri[0].normal, tri[1].normal, tri[2].normal], ws, w);
    let tangent = perspective_correct(
        weights,
        [tri[0].tangent, tri[1].tangent, tri[2].tangent],
        ws,
        w,
    );
    let view_direction = perspective_correct(
        weights,
        [
            tri[0].view_direction,
            tri[1].view_direction,
            tri[2].view_direction,
        ],
        ws,
        w,
    );

    Fragment {
        x,
        y,
        depth,
        w,
        texcoord,
        normal: normal.normalize(),
        tangent: tangent.normalize(),
        view_direction: view_direction.normalize(),
    }
}
