use nalgebra::{Point2, Vector3};
use std::ops::{Add, Mul};

const EPSILON: f32 = 1e-6;

/// 2D cross product of the edge `a -> b` with the vector `a -> p`.
///
/// Positive when `p` lies on the clockwise side of the edge in a y-down
/// screen space, zero on the edge itself.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let edge = b - a;
    let to_point = p - a;
    edge.x * to_point.y - edge.y * to_point.x
}

/// Twice the signed screen-space area of the triangle `(v0, v1, v2)`.
#[inline]
pub fn signed_area(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v0, v1, v2)
}

/// Calculates the barycentric weights `(w0, w1, w2)` of `p` from the three edge
/// functions of the triangle.
///
/// A point counts as covered when every edge value has the same sign as the
/// triangle's signed area, so both windings rasterize. The weights are the edge
/// values divided by their sum, hence non-negative and summing to one.
///
/// Returns `None` if the triangle is degenerate or `p` lies outside it.
pub fn barycentric_weights(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let area = signed_area(v0, v1, v2);
    if area.abs() < EPSILON {
        return None;
    }

    let e0 = edge_function(v1, v2, p);
    let e1 = edge_function(v2, v0, p);
    let e2 = edge_function(v0, v1, p);

    let covered = if area > 0.0 {
        e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0
    } else {
        e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0
    };
    if !covered {
        return None;
    }

    let total = e0 + e1 + e2;
    if total.abs() < EPSILON {
        return None;
    }

    Some(Vector3::new(e0 / total, e1 / total, e2 / total))
}

/// Harmonic interpolation `1 / Σ wi / vi`.
///
/// Used both for depth (with the post-divide z of each vertex) and for the
/// clip w (with the pre-divide w of each vertex).
#[inline]
pub fn interpolate_reciprocal(weights: Vector3<f32>, values: [f32; 3]) -> f32 {
    1.0 / (weights.x / values[0] + weights.y / values[1] + weights.z / values[2])
}

/// Perspective-correct interpolation of a vertex attribute:
/// `(Σ wi · Ai / wvi) × w`, where `wvi` are the vertex clip w values and `w`
/// is the interpolated clip w.
#[inline]
pub fn perspective_correct<T>(
    weights: Vector3<f32>,
    attributes: [T; 3],
    vertex_w: [f32; 3],
    interpolated_w: f32,
) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    (attributes[0] * (weights.x / vertex_w[0])
        + attributes[1] * (weights.y / vertex_w[1])
        + attributes[2] * (weights.z / vertex_w[2]))
        * interpolated_w
}

/// Maps `value` from `[min, max]` onto `[0, 1]` without clamping.
#[inline]
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}
