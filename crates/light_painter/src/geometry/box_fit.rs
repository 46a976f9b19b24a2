//! Minimum-area oriented rectangles
//!
//! Points are rotated so the reference normal lines up with +Z, fitted with the
//! smallest rectangle around their 2D hull, and the result is rotated back.

use crate::foundation::math::{rotation_between, Rot3, Vec2, Vec3};
use crate::geometry::hull::convex_hull_2d;

/// Minimum bounding rectangle of a point set flattened against a normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    /// World-space center of the rectangle
    pub center: Vec3,
    /// Rotation taking the rectangle's local frame (normal on +Z) to world space
    pub rotation: Rot3,
    /// Extent along the local X axis
    pub length: f32,
    /// Extent along the local Y axis
    pub width: f32,
}

fn rotate_2d(p: &Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * p.x - sin * p.y, sin * p.x + cos * p.y)
}

fn bounds_2d(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::repeat(f32::MAX), Vec2::repeat(f32::MIN)),
        |(lo, hi), p| (lo.inf(p), hi.sup(p)),
    )
}

/// Angle that rotates `points` so their minimum-area bounding box is axis aligned.
///
/// Rotating calipers over the hull edges; the first edge reaching the minimum
/// area wins, which keeps the result stable for symmetric inputs.
pub fn box_fit_2d(points: &[Vec2]) -> f32 {
    let hull = convex_hull_2d(points);
    match hull.len() {
        0 | 1 => 0.0,
        2 => {
            let edge = hull[1] - hull[0];
            -edge.y.atan2(edge.x)
        }
        n => {
            let mut best_angle = 0.0;
            let mut best_area = f32::INFINITY;
            for i in 0..n {
                let edge = hull[(i + 1) % n] - hull[i];
                let angle = -edge.y.atan2(edge.x);
                let rotated: Vec<Vec2> = hull.iter().map(|p| rotate_2d(p, angle)).collect();
                let (lo, hi) = bounds_2d(&rotated);
                let extent = hi - lo;
                let area = extent.x * extent.y;
                if area < best_area * (1.0 - 1e-6) {
                    best_area = area;
                    best_angle = angle;
                }
            }
            best_angle
        }
    }
}

/// Fit the minimum-area rectangle around `points` as seen along `normal`.
///
/// Returns `None` for an empty point set. Fewer than three distinct points give a
/// zero length and/or width.
pub fn get_box(points: &[Vec3], normal: &Vec3) -> Option<OrientedRect> {
    let first = points.first()?;

    let align = rotation_between(normal, &Vec3::z()).to_rotation_matrix();
    let flattened: Vec<Vec3> = points.iter().map(|p| align * p).collect();
    let flat_2d: Vec<Vec2> = flattened.iter().map(|p| p.xy()).collect();

    let angle = box_fit_2d(&flat_2d);
    let box_rotation = Rot3::from_axis_angle(&Vec3::z_axis(), angle);

    let fitted: Vec<Vec2> = flattened.iter().map(|p| (box_rotation * p).xy()).collect();
    let (lo, hi) = bounds_2d(&fitted);
    let extent = hi - lo;

    let rotation = align.inverse() * box_rotation.inverse();
    let local_center = Vec3::new(lo.x + extent.x * 0.5, lo.y + extent.y * 0.5, (align * first).z);

    Some(OrientedRect {
        center: rotation * local_center,
        rotation,
        length: extent.x,
        width: extent.y,
    })
}
