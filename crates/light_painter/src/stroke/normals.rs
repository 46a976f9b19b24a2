//! Normal aggregation and estimation

use crate::error::{PaintError, PaintResult};
use crate::foundation::math::Vec3;

/// Sums below this length count as cancelled out
const DEGENERATE_LENGTH: f32 = 1e-12;

/// Normalized sum of `normals`.
///
/// Fails with [`PaintError::DegenerateNormal`] when the normals cancel, since any
/// substitute direction would silently light the wrong side of the scene.
pub fn average_normal(normals: &[Vec3]) -> PaintResult<Vec3> {
    let sum = normals.iter().fold(Vec3::zeros(), |acc, n| acc + n);
    sum.try_normalize(DEGENERATE_LENGTH).ok_or(PaintError::DegenerateNormal)
}

/// Estimate per-sample normals for a stroke given only positions.
///
/// Interior samples bend toward their neighbours; endpoints copy the adjacent
/// estimate. Straight runs have no curvature and fall back to world +Z.
pub fn estimate_stroke_normals(positions: &[Vec3]) -> Vec<Vec3> {
    let n = positions.len();
    if n < 3 {
        return vec![Vec3::z(); n];
    }

    let mut normals: Vec<Option<Vec3>> = (0..n)
        .map(|i| {
            if i == 0 || i == n - 1 {
                return None;
            }
            let bend = (positions[i - 1] - positions[i]) + (positions[i + 1] - positions[i]);
            bend.try_normalize(DEGENERATE_LENGTH)
        })
        .collect();

    normals[0] = normals[1];
    normals[n - 1] = normals[n - 2];

    // Fill straight spots from the nearest curved neighbour
    let fallback = normals.iter().flatten().next().copied().unwrap_or_else(Vec3::z);
    let mut last = fallback;
    normals
        .into_iter()
        .map(|normal| {
            let resolved = normal.unwrap_or(last);
            last = resolved;
            resolved
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_average_normal() {
        let avg = average_normal(&[Vec3::x(), Vec3::y()]).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(avg, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_average_normal_degenerate() {
        let result = average_normal(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)]);
        assert_eq!(result, Err(PaintError::DegenerateNormal));
        assert_eq!(average_normal(&[]), Err(PaintError::DegenerateNormal));
    }

    #[test]
    fn test_estimate_normals_on_arc() {
        let positions = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let normals = estimate_stroke_normals(&positions);
        assert_eq!(normals.len(), 3);
        for n in &normals {
            assert_relative_eq!(*n, -Vec3::y(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_estimate_normals_straight_line() {
        let positions = [Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0, Vec3::x() * 3.0];
        for n in estimate_stroke_normals(&positions) {
            assert_relative_eq!(n, Vec3::z(), epsilon = EPSILON);
        }
        assert_eq!(estimate_stroke_normals(&[Vec3::zeros()]), vec![Vec3::z()]);
    }
}
