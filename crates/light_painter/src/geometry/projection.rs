//! Flattening point sets onto a plane

use crate::foundation::math::{project_onto, Vec3};

/// Index of the point whose projection onto `normal` is longest.
///
/// Ties keep the earliest point.
pub fn farthest_along(points: &[Vec3], normal: &Vec3) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in points.iter().enumerate() {
        let reach = project_onto(p, normal).norm_squared();
        if best.map_or(true, |(_, b)| reach > b) {
            best = Some((i, reach));
        }
    }
    best.map(|(i, _)| i)
}

/// Project every point onto the plane through `origin` perpendicular to `normal`
pub fn project_to_plane(points: &[Vec3], origin: &Vec3, normal: &Vec3) -> Vec<Vec3> {
    points.iter().map(|p| p + project_onto(&(origin - p), normal)).collect()
}

/// Flatten points onto the plane through the point farthest along `normal`.
///
/// This is the "back" of a painted patch as seen from a light facing along `normal`.
pub fn flatten_to_back_plane(points: &[Vec3], normal: &Vec3) -> Vec<Vec3> {
    match farthest_along(points, normal) {
        Some(index) => project_to_plane(points, &points[index], normal),
        None => Vec::new(),
    }
}
