//! Geometry for emissive hull and tube lights
//!
//! Neither kind reduces the strokes to a single placement. Mesh lights hull the
//! painted cloud; tube lights keep every stroke as a polyline for skinning.

use std::collections::{HashMap, HashSet};

use crate::core::config::{MeshSettings, TubeSettings};
use crate::error::PaintResult;
use crate::foundation::math::Vec3;
use crate::geometry::flatten_to_back_plane;
use crate::lighting::{MeshLight, TubeLight};
use crate::scene::MeshHandle;
use crate::stroke::{average_normal, ResolvedStroke};

/// Points to hull for a mesh light, optionally flattened against the average normal
pub fn hull_points(resolved: &ResolvedStroke, flatten: bool) -> PaintResult<Vec<Vec3>> {
    if !flatten {
        return Ok(resolved.positions.clone());
    }
    let normal = average_normal(&resolved.normals)?;
    Ok(flatten_to_back_plane(&resolved.positions, &normal))
}

/// Emissive material settings applied to a hulled mesh
pub fn mesh_light(mesh: MeshHandle, settings: &MeshSettings) -> MeshLight {
    MeshLight {
        mesh,
        emit_value: settings.emit_value,
        color: settings.color,
        visibility: settings.visibility,
    }
}

/// Vertices and edges of a polyline network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeGeometry {
    /// Polyline vertices
    pub vertices: Vec<Vec3>,
    /// Edges between vertex indices
    pub edges: Vec<[u32; 2]>,
}

/// One polyline per stroke, concatenated
#[allow(clippy::cast_possible_truncation)]
pub fn tube_geometry(strokes: &[ResolvedStroke]) -> TubeGeometry {
    let mut geometry = TubeGeometry::default();
    for stroke in strokes {
        let base = geometry.vertices.len() as u32;
        geometry.vertices.extend_from_slice(&stroke.positions);
        let count = stroke.positions.len() as u32;
        geometry.edges.extend((1..count).map(|i| [base + i - 1, base + i]));
    }
    geometry
}

/// Smallest grid cell used when merging, so a zero threshold still buckets
const MIN_MERGE_CELL: f32 = 1e-6;

type Cell = (i64, i64, i64);

#[allow(clippy::cast_possible_truncation)]
fn merge_cell(v: &Vec3, cell_size: f32) -> Cell {
    let cell = *v / cell_size;
    (cell.x.floor() as i64, cell.y.floor() as i64, cell.z.floor() as i64)
}

/// Merge vertices closer than `threshold` into the first one seen.
///
/// Kept vertices are bucketed on a grid of `threshold`-sized cells, so each
/// vertex only compares against the 27 cells around it. Edges are remapped;
/// collapsed and repeated edges are dropped.
#[allow(clippy::cast_possible_truncation)]
pub fn merge_by_distance(geometry: &TubeGeometry, threshold: f32) -> TubeGeometry {
    let threshold_sq = threshold * threshold;
    let cell_size = threshold.max(MIN_MERGE_CELL);
    let mut grid: HashMap<Cell, Vec<u32>> = HashMap::new();
    let mut vertices: Vec<Vec3> = Vec::with_capacity(geometry.vertices.len());

    let remap: Vec<u32> = geometry
        .vertices
        .iter()
        .map(|v| {
            let (cx, cy, cz) = merge_cell(v, cell_size);
            let nearest = (-1..=1)
                .flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (cx + dx, cy + dy, cz + dz))))
                .filter_map(|cell| grid.get(&cell))
                .flatten()
                .copied()
                .filter(|&index| (vertices[index as usize] - v).norm_squared() <= threshold_sq)
                .min();

            nearest.unwrap_or_else(|| {
                let index = vertices.len() as u32;
                vertices.push(*v);
                grid.entry((cx, cy, cz)).or_default().push(index);
                index
            })
        })
        .collect();

    let mut seen = HashSet::new();
    let edges = geometry
        .edges
        .iter()
        .filter_map(|&[a, b]| {
            let (a, b) = (remap[a as usize], remap[b as usize]);
            if a == b {
                return None;
            }
            seen.insert((a.min(b), a.max(b))).then_some([a, b])
        })
        .collect();

    TubeGeometry { vertices, edges }
}

/// Skinned tube light through every stroke
pub fn derive_tube(strokes: &[ResolvedStroke], settings: &TubeSettings) -> TubeLight {
    let geometry = merge_by_distance(&tube_geometry(strokes), settings.merge_distance);
    TubeLight {
        vertices: geometry.vertices,
        edges: geometry.edges,
        skin_radius: settings.skin_radius,
        pre_subdiv: settings.pre_subdiv,
        post_subdiv: settings.post_subdiv,
        smooth: settings.smooth,
        emit_value: settings.emit_value,
        color: settings.color,
        visibility: settings.visibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaintError;
    use approx::assert_relative_eq;

    fn stroke(positions: &[Vec3], normal: Vec3) -> ResolvedStroke {
        ResolvedStroke {
            positions: positions.to_vec(),
            normals: vec![normal; positions.len()],
            original_positions: positions.to_vec(),
        }
    }

    #[test]
    fn test_hull_points_flatten_toggle() {
        let resolved = stroke(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 2.0)], Vec3::z());
        assert_eq!(hull_points(&resolved, false).unwrap(), resolved.positions);

        let flat = hull_points(&resolved, true).unwrap();
        assert_relative_eq!(flat[0].z, 2.0, epsilon = 1e-5);
        assert_relative_eq!(flat[1].z, 2.0, epsilon = 1e-5);

        let cancelled = ResolvedStroke {
            normals: vec![Vec3::z(), -Vec3::z()],
            ..resolved
        };
        assert_eq!(hull_points(&cancelled, true), Err(PaintError::DegenerateNormal));
    }

    #[test]
    fn test_tube_edges_follow_running_offset() {
        let strokes = [
            stroke(&[Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0], Vec3::z()),
            stroke(&[Vec3::y() * 5.0], Vec3::z()),
            stroke(&[Vec3::y(), Vec3::y() * 2.0], Vec3::z()),
        ];
        let geometry = tube_geometry(&strokes);
        assert_eq!(geometry.vertices.len(), 6);
        assert_eq!(geometry.edges, vec![[0, 1], [1, 2], [4, 5]]);
    }

    #[test]
    fn test_merge_joins_close_vertices() {
        let strokes = [
            stroke(&[Vec3::zeros(), Vec3::x()], Vec3::z()),
            stroke(&[Vec3::new(1.01, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)], Vec3::z()),
            stroke(&[Vec3::new(0.0, 0.0, 0.02), Vec3::new(1.0, 0.0, 0.01)], Vec3::z()),
        ];
        let merged = merge_by_distance(&tube_geometry(&strokes), 0.05);
        assert_eq!(merged.vertices.len(), 3);
        // The third stroke duplicates the first edge
        assert_eq!(merged.edges, vec![[0, 1], [1, 2]]);
    }

    #[test]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn test_grid_merge_matches_exhaustive_scan() {
        // Deterministic scatter dense enough that many cells hold several points
        let vertices: Vec<Vec3> = (0..400)
            .map(|i| {
                let t = i as f32;
                Vec3::new((t * 0.37).sin(), (t * 0.53).cos(), (t * 0.11).sin() * 0.2)
            })
            .collect();
        let edges = (1..vertices.len() as u32).map(|i| [i - 1, i]).collect();
        let geometry = TubeGeometry { vertices, edges };
        let threshold = 0.08_f32;

        let mut kept: Vec<Vec3> = Vec::new();
        let remap: Vec<u32> = geometry
            .vertices
            .iter()
            .map(|v| {
                let index = kept
                    .iter()
                    .position(|k| (k - v).norm_squared() <= threshold * threshold)
                    .unwrap_or_else(|| {
                        kept.push(*v);
                        kept.len() - 1
                    });
                index as u32
            })
            .collect();
        let mut seen = HashSet::new();
        let expected_edges: Vec<[u32; 2]> = geometry
            .edges
            .iter()
            .map(|&[a, b]| (remap[a as usize], remap[b as usize]))
            .filter(|&(a, b)| a != b && seen.insert((a.min(b), a.max(b))))
            .map(|(a, b)| [a, b])
            .collect();

        let merged = merge_by_distance(&geometry, threshold);
        assert!(merged.vertices.len() < geometry.vertices.len());
        assert_eq!(merged.vertices, kept);
        assert_eq!(merged.edges, expected_edges);
    }

    #[test]
    fn test_merge_across_cell_boundary() {
        let strokes = [stroke(&[Vec3::new(0.049, 0.0, 0.0), Vec3::new(0.051, 0.0, 0.0)], Vec3::z())];
        let merged = merge_by_distance(&tube_geometry(&strokes), 0.05);
        assert_eq!(merged.vertices.len(), 1);
        assert!(merged.edges.is_empty());

        let exact = merge_by_distance(&tube_geometry(&strokes), 0.0);
        assert_eq!(exact.vertices.len(), 2);
    }

    #[test]
    fn test_derive_tube_copies_settings() {
        let settings = TubeSettings::default();
        let tube = derive_tube(&[stroke(&[Vec3::zeros(), Vec3::x()], Vec3::z())], &settings);
        assert_eq!(tube.edges.len(), 1);
        assert_relative_eq!(tube.skin_radius, settings.skin_radius);
        assert_eq!(tube.pre_subdiv, 2);
    }
}
