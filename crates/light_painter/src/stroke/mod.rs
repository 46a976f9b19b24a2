//! Painted strokes
//!
//! A stroke is one continuous paint gesture, stored as ordered surface samples.
//! Strokes are gathered in a [`StrokeCollection`], which is what every command
//! consumes.

pub mod axis;
pub mod normals;

use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};
use crate::foundation::math::Vec3;

pub use axis::{get_strokes, get_strokes_with_normals, resolve_axis, AxisMode, ResolvedStroke, RAY_OFFSET};
pub use normals::{average_normal, estimate_stroke_normals};

/// One paint sample on a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    /// World-space position
    pub position: Vec3,
    /// Surface normal at the position
    pub normal: Vec3,
}

impl StrokePoint {
    /// Create a sample
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Whether strokes are pooled into one result or handled one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrokeCountMode {
    /// Pool every stroke into one light
    #[default]
    One,
    /// One light per stroke
    PerStroke,
}

/// Ordered samples of one paint gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    points: Vec<StrokePoint>,
}

impl Stroke {
    /// Create an empty stroke
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stroke from samples
    pub fn from_points(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    /// Build a stroke from positions alone, estimating normals from its curvature
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let normals = estimate_stroke_normals(positions);
        Self {
            points: positions
                .iter()
                .zip(normals)
                .map(|(p, n)| StrokePoint::new(*p, n))
                .collect(),
        }
    }

    /// Append a sample
    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    /// Samples in paint order
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no samples were recorded
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample positions
    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.position).collect()
    }
}

type SerializedPoint = ((f32, f32, f32), (f32, f32, f32));

/// All strokes painted in a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeCollection {
    strokes: Vec<Stroke>,
}

impl StrokeCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from strokes
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Parse a literal stroke path.
    ///
    /// The format is a list of strokes, each a list of `((x, y, z), (nx, ny, nz))`
    /// samples: `[[((0, 0, 0), (0, 0, 1)), ((1, 0, 0), (0, 0, 1))]]`.
    pub fn from_path_str(path: &str) -> PaintResult<Self> {
        let raw: Vec<Vec<SerializedPoint>> =
            ron::from_str(path).map_err(|e| PaintError::InvalidStrokePath(e.to_string()))?;

        let strokes = raw
            .into_iter()
            .map(|stroke| {
                Stroke::from_points(
                    stroke
                        .into_iter()
                        .map(|((x, y, z), (nx, ny, nz))| {
                            StrokePoint::new(Vec3::new(x, y, z), Vec3::new(nx, ny, nz))
                        })
                        .collect(),
                )
            })
            .collect();

        Ok(Self { strokes })
    }

    /// Serialize to the literal stroke path format
    pub fn to_path_string(&self) -> PaintResult<String> {
        let raw: Vec<Vec<SerializedPoint>> = self
            .strokes
            .iter()
            .map(|stroke| {
                stroke
                    .points
                    .iter()
                    .map(|p| {
                        (
                            (p.position.x, p.position.y, p.position.z),
                            (p.normal.x, p.normal.y, p.normal.z),
                        )
                    })
                    .collect()
            })
            .collect();
        ron::to_string(&raw).map_err(|e| PaintError::InvalidStrokePath(e.to_string()))
    }

    /// Strokes in paint order, including empty ones
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Strokes that hold at least one sample
    pub fn non_empty(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().filter(|s| !s.is_empty())
    }

    /// Number of strokes, including empty ones
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// True when there are no strokes at all
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total samples across all strokes
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Every sample position, in paint order
    pub fn positions(&self) -> Vec<Vec3> {
        self.strokes.iter().flat_map(|s| s.points.iter().map(|p| p.position)).collect()
    }

    /// Start a new, empty stroke
    pub fn begin_stroke(&mut self) {
        if self.strokes.last().map_or(true, |s| !s.is_empty()) {
            self.strokes.push(Stroke::new());
        }
    }

    /// Append a sample to the current stroke, starting one if needed
    pub fn push(&mut self, point: StrokePoint) {
        match self.strokes.last_mut() {
            Some(stroke) => stroke.push(point),
            None => self.strokes.push(Stroke::from_points(vec![point])),
        }
    }

    /// Remove samples within `radius` of `center`, splitting strokes at the gaps.
    ///
    /// Returns the number of samples removed.
    pub fn erase(&mut self, center: &Vec3, radius: f32) -> usize {
        let radius_sq = radius * radius;
        let before = self.point_count();
        let mut result = Vec::with_capacity(self.strokes.len());

        for stroke in self.strokes.drain(..) {
            let mut current = Vec::new();
            for point in stroke.points {
                if (point.position - center).norm_squared() <= radius_sq {
                    if !current.is_empty() {
                        result.push(Stroke::from_points(std::mem::take(&mut current)));
                    }
                } else {
                    current.push(point);
                }
            }
            if !current.is_empty() {
                result.push(Stroke::from_points(current));
            }
        }

        self.strokes = result;
        before - self.point_count()
    }
}

/// Anything that can hand strokes to a command
pub trait StrokeSource {
    /// Strokes painted so far
    fn strokes(&self) -> &StrokeCollection;

    /// Gate for commands: true once at least one sample exists
    fn has_strokes(&self) -> bool {
        self.strokes().point_count() > 0
    }
}

impl StrokeSource for StrokeCollection {
    fn strokes(&self) -> &StrokeCollection {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_stroke_path() {
        let path = "[[((0, 0, 0), (0, 0, 1)), ((1.5, 0, 0), (0, 0, 1))], [((0, 2, 0), (1, 1, 1))]]";
        let strokes = StrokeCollection::from_path_str(path).unwrap();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes.point_count(), 3);
        assert_relative_eq!(strokes.strokes()[0].points()[1].position, Vec3::new(1.5, 0.0, 0.0));
        assert_relative_eq!(strokes.strokes()[1].points()[0].normal, Vec3::new(1.0, 1.0, 1.0));
        assert!(strokes.has_strokes());
    }

    #[test]
    fn test_stroke_path_round_trip() {
        let path = "[[((0, 0, 0), (0, 0, 1))]]";
        let strokes = StrokeCollection::from_path_str(path).unwrap();
        let text = strokes.to_path_string().unwrap();
        assert_eq!(StrokeCollection::from_path_str(&text).unwrap(), strokes);
    }

    #[test]
    fn test_invalid_stroke_path() {
        let err = StrokeCollection::from_path_str("[[(0, 0, 0)]]").unwrap_err();
        assert!(matches!(err, PaintError::InvalidStrokePath(_)));
        assert!(!StrokeCollection::from_path_str("[]").unwrap().has_strokes());
    }

    #[test]
    fn test_erase_splits_stroke() {
        let mut strokes = StrokeCollection::from_strokes(vec![Stroke::from_points(
            (0..5)
                .map(|i| StrokePoint::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::z()))
                .collect(),
        )]);

        let removed = strokes.erase(&Vec3::new(2.0, 0.0, 0.0), 0.5);
        assert_eq!(removed, 1);
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes.strokes()[0].len(), 2);
        assert_eq!(strokes.strokes()[1].len(), 2);

        let removed = strokes.erase(&Vec3::zeros(), 10.0);
        assert_eq!(removed, 4);
        assert!(strokes.is_empty());
    }

    #[test]
    fn test_begin_stroke_reuses_empty_stroke() {
        let mut strokes = StrokeCollection::new();
        strokes.push(StrokePoint::new(Vec3::zeros(), Vec3::z()));
        strokes.begin_stroke();
        strokes.begin_stroke();
        assert_eq!(strokes.len(), 2);
        strokes.push(StrokePoint::new(Vec3::x(), Vec3::z()));
        assert_eq!(strokes.strokes()[1].len(), 1);
        assert_eq!(strokes.non_empty().count(), 2);
    }
}
