//! Axis and offset resolution
//!
//! Decides which normal each painted sample is pushed along before any light is
//! derived, and applies the offset.

use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};
use crate::foundation::math::Vec3;
use crate::geometry::Ray;
use crate::scene::SceneQuery;
use crate::stroke::{StrokePoint, StrokeSource};

/// Nudge along the normal before casting back onto the surface
pub const RAY_OFFSET: f32 = 0.001;

/// How stroke normals are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisMode {
    /// World X for every sample
    X,
    /// World Y for every sample
    Y,
    /// World Z for every sample
    Z,
    /// The sample's own normal
    #[default]
    Normal,
    /// The normal of the surface underneath the sample
    NormalRay,
    /// Camera direction mirrored about the sample normal
    Reflect,
}

impl AxisMode {
    /// Mode after pressing the key for `pressed`: the same key twice returns to `Normal`
    #[must_use]
    pub fn toggle(self, pressed: Self) -> Self {
        if self == pressed { Self::Normal } else { pressed }
    }

    /// True when resolution needs a scene camera
    pub fn needs_camera(self) -> bool {
        self == Self::Reflect
    }
}

/// Stroke samples after axis and offset resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStroke {
    /// Offset positions
    pub positions: Vec<Vec3>,
    /// Resolved normals, negated for negative offsets
    pub normals: Vec<Vec3>,
    /// Positions before the offset was applied
    pub original_positions: Vec<Vec3>,
}

impl ResolvedStroke {
    /// Concatenate several resolved strokes into one pooled set
    pub fn pooled(strokes: &[Self]) -> Self {
        let mut pooled = Self::default();
        for stroke in strokes {
            pooled.positions.extend_from_slice(&stroke.positions);
            pooled.normals.extend_from_slice(&stroke.normals);
            pooled.original_positions.extend_from_slice(&stroke.original_positions);
        }
        pooled
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no samples
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn reflect(direction: &Vec3, normal: &Vec3) -> Vec3 {
    let reflected = direction - normal * (2.0 * direction.dot(normal));
    reflected.try_normalize(0.0).unwrap_or(reflected)
}

/// Resolve normals for `points` under `axis`, then push positions along them by `offset`.
///
/// A negative offset also flips the returned normals, so callers that negate the
/// normal to face the surface behave the same on either side.
pub fn resolve_axis(
    points: &[StrokePoint],
    axis: AxisMode,
    offset: f32,
    scene: &dyn SceneQuery,
) -> PaintResult<ResolvedStroke> {
    let camera = if axis.needs_camera() {
        Some(scene.camera_position().ok_or(PaintError::MissingCamera)?)
    } else {
        None
    };

    if points.is_empty() {
        return Err(PaintError::NoStrokes);
    }

    let mut positions: Vec<Vec3> = points.iter().map(|p| p.position).collect();
    let mut normals: Vec<Vec3> = match axis {
        AxisMode::X => vec![Vec3::x(); points.len()],
        AxisMode::Y => vec![Vec3::y(); points.len()],
        AxisMode::Z => vec![Vec3::z(); points.len()],
        AxisMode::Normal => points.iter().map(|p| p.normal).collect(),
        AxisMode::NormalRay => {
            let mut normals = Vec::with_capacity(points.len());
            for (point, position) in points.iter().zip(positions.iter_mut()) {
                let origin = point.position + point.normal * RAY_OFFSET;
                match scene.ray_cast(&Ray::new(origin, -point.normal), f32::INFINITY) {
                    Some(hit) => {
                        *position = hit.point;
                        normals.push(hit.normal);
                    }
                    None => normals.push(point.normal),
                }
            }
            normals
        }
        AxisMode::Reflect => {
            let camera = camera.ok_or(PaintError::MissingCamera)?;
            points
                .iter()
                .map(|p| {
                    let view = (p.position - camera).try_normalize(0.0).unwrap_or_else(Vec3::zeros);
                    reflect(&view, &p.normal)
                })
                .collect()
        }
    };

    let original_positions = positions.clone();

    if offset != 0.0 {
        for (position, normal) in positions.iter_mut().zip(&normals) {
            *position += normal * offset;
        }
    }
    if offset < 0.0 {
        for normal in &mut normals {
            *normal = -*normal;
        }
    }

    Ok(ResolvedStroke { positions, normals, original_positions })
}

/// Resolve every non-empty stroke of a source, one result per stroke
pub fn get_strokes_with_normals(
    source: &dyn StrokeSource,
    axis: AxisMode,
    offset: f32,
    scene: &dyn SceneQuery,
) -> PaintResult<Vec<ResolvedStroke>> {
    if !source.has_strokes() {
        return Err(PaintError::NoStrokes);
    }
    source
        .strokes()
        .non_empty()
        .map(|stroke| resolve_axis(stroke.points(), axis, offset, scene))
        .collect()
}

/// Resolved positions of every non-empty stroke
pub fn get_strokes(
    source: &dyn StrokeSource,
    axis: AxisMode,
    offset: f32,
    scene: &dyn SceneQuery,
) -> PaintResult<Vec<Vec<Vec3>>> {
    Ok(get_strokes_with_normals(source, axis, offset, scene)?
        .into_iter()
        .map(|stroke| stroke.positions)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use crate::stroke::{Stroke, StrokeCollection};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn origin_point(normal: Vec3) -> Vec<StrokePoint> {
        vec![StrokePoint::new(Vec3::zeros(), normal)]
    }

    #[test]
    fn test_negative_offset_flips_normals() {
        let scene = MemoryScene::new();
        let resolved = resolve_axis(&origin_point(Vec3::z()), AxisMode::Z, -1.0, &scene).unwrap();
        assert_relative_eq!(resolved.positions[0], Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(resolved.normals[0], Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(resolved.original_positions[0], Vec3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn test_world_axis_overrides_normal() {
        let scene = MemoryScene::new();
        let resolved =
            resolve_axis(&origin_point(Vec3::new(1.0, 1.0, 1.0)), AxisMode::X, 1.0, &scene).unwrap();
        assert_relative_eq!(resolved.positions[0], Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(resolved.normals[0], Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_normal_mode_keeps_supplied_normal() {
        let scene = MemoryScene::new();
        let normal = Vec3::new(1.0, 1.0, 1.0);
        let resolved = resolve_axis(&origin_point(normal), AxisMode::Normal, 1.0, &scene).unwrap();
        assert_relative_eq!(resolved.positions[0], Vec3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(resolved.normals[0], normal, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_offset_leaves_positions() {
        let scene = MemoryScene::new();
        let resolved = resolve_axis(&origin_point(Vec3::y()), AxisMode::Y, 0.0, &scene).unwrap();
        assert_eq!(resolved.positions, resolved.original_positions);
    }

    #[test]
    fn test_normal_ray_snaps_to_underlying_surface() {
        let mut scene = MemoryScene::new();
        // Tilted plane through the origin, normal leaning toward +X
        scene.add_quad(Vec3::zeros(), Vec3::y() * 5.0, Vec3::new(-1.0, 0.0, 1.0).normalize() * 5.0);

        // Annotation floating just above the plane with a vertical normal
        let points = vec![StrokePoint::new(Vec3::new(0.0, 0.0, 0.5), Vec3::z())];
        let resolved = resolve_axis(&points, AxisMode::NormalRay, 0.0, &scene).unwrap();

        assert_relative_eq!(resolved.positions[0].z, 0.0, epsilon = EPSILON);
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert_relative_eq!(resolved.normals[0], expected, epsilon = EPSILON);

        // Nothing below: keep the sample
        let floating = vec![StrokePoint::new(Vec3::new(50.0, 0.0, 0.5), Vec3::z())];
        let resolved = resolve_axis(&floating, AxisMode::NormalRay, 0.0, &scene).unwrap();
        assert_relative_eq!(resolved.positions[0], floating[0].position);
        assert_relative_eq!(resolved.normals[0], Vec3::z());
    }

    #[test]
    fn test_reflect_mirrors_camera_direction() {
        let scene = MemoryScene::new().with_camera(Vec3::new(-1.0, 0.0, 1.0));
        let resolved = resolve_axis(&origin_point(Vec3::z()), AxisMode::Reflect, 0.0, &scene).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert_relative_eq!(resolved.normals[0], expected, epsilon = EPSILON);
    }

    #[test]
    fn test_reflect_without_camera_fails() {
        let scene = MemoryScene::new();
        let result = resolve_axis(&origin_point(Vec3::z()), AxisMode::Reflect, 1.0, &scene);
        assert_eq!(result, Err(PaintError::MissingCamera));
    }

    #[test]
    fn test_axis_toggle() {
        assert_eq!(AxisMode::Normal.toggle(AxisMode::X), AxisMode::X);
        assert_eq!(AxisMode::X.toggle(AxisMode::X), AxisMode::Normal);
        assert_eq!(AxisMode::X.toggle(AxisMode::Reflect), AxisMode::Reflect);
    }

    #[test]
    fn test_get_strokes_skips_empty_and_requires_samples() {
        let scene = MemoryScene::new();
        let empty = StrokeCollection::new();
        assert_eq!(
            get_strokes(&empty, AxisMode::Z, 1.0, &scene),
            Err(PaintError::NoStrokes)
        );

        let strokes = StrokeCollection::from_strokes(vec![
            Stroke::from_points(origin_point(Vec3::z())),
            Stroke::new(),
            Stroke::from_points(vec![StrokePoint::new(Vec3::x(), Vec3::z())]),
        ]);
        let positions = get_strokes(&strokes, AxisMode::Z, 1.0, &scene).unwrap();
        assert_eq!(positions.len(), 2);
        assert_relative_eq!(positions[1][0], Vec3::new(1.0, 0.0, 1.0), epsilon = EPSILON);

        let resolved = get_strokes_with_normals(&strokes, AxisMode::Z, 1.0, &scene).unwrap();
        let pooled = ResolvedStroke::pooled(&resolved);
        assert_eq!(pooled.len(), 2);
    }
}
