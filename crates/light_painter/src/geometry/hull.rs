//! Convex hulls in 2D and 3D
//!
//! The 2D hull feeds the minimum-area box fit. The 3D hull builds the card and
//! mesh-light geometry from a point cloud, with a planar fallback for clouds that
//! have been flattened onto a plane.

use std::cmp::Ordering;

use crate::foundation::math::{Vec2, Vec3};

/// A triangulated convex hull
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexHull {
    /// Hull vertices, only those referenced by faces (or the input points when degenerate)
    pub vertices: Vec<Vec3>,
    /// Outward-facing triangles indexing into `vertices`
    pub faces: Vec<[u32; 3]>,
}

impl ConvexHull {
    /// True when the hull has no faces (fewer than three non-collinear points)
    pub fn is_degenerate(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Cross product sign to determine turn direction.
fn cross_2d(o: &Vec2, a: &Vec2, b: &Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn lexicographic(a: &Vec2, b: &Vec2) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Indices of the 2D convex hull in counter-clockwise order (monotone chain).
///
/// Duplicate and collinear points are dropped. Two distinct points give a
/// two-element hull, a single point a one-element hull.
pub fn convex_hull_2d_indices(points: &[Vec2]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| lexicographic(&points[a], &points[b]));
    order.dedup_by(|a, b| points[*a] == points[*b]);

    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);

    // Lower chain
    for &i in &order {
        while hull.len() >= 2
            && cross_2d(&points[hull[hull.len() - 2]], &points[hull[hull.len() - 1]], &points[i]) <= 0.0
        {
            hull.pop();
        }
        hull.push(i);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross_2d(&points[hull[hull.len() - 2]], &points[hull[hull.len() - 1]], &points[i]) <= 0.0
        {
            hull.pop();
        }
        hull.push(i);
    }

    // Last point repeats the first
    hull.pop();
    hull
}

/// 2D convex hull points in counter-clockwise order
pub fn convex_hull_2d(points: &[Vec2]) -> Vec<Vec2> {
    convex_hull_2d_indices(points).into_iter().map(|i| points[i]).collect()
}

enum Simplex {
    Degenerate,
    Planar([usize; 3]),
    Solid([usize; 4]),
}

fn tolerance(points: &[Vec3]) -> f32 {
    let (min, max) = points.iter().fold(
        (Vec3::repeat(f32::MAX), Vec3::repeat(f32::MIN)),
        |(lo, hi), p| (lo.inf(p), hi.sup(p)),
    );
    1e-5 * (max - min).amax().max(1.0)
}

fn farthest_by<F: Fn(&Vec3) -> f32>(points: &[Vec3], metric: F) -> (usize, f32) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, metric(p)))
        .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn initial_simplex(points: &[Vec3], eps: f32) -> Simplex {
    let p0 = farthest_by(points, |p| -p.x).0;
    let (p1, dist) = farthest_by(points, |p| (p - points[p0]).norm());
    if dist < eps {
        return Simplex::Degenerate;
    }

    let line_dir = (points[p1] - points[p0]).normalize();
    let (p2, line_dist) = farthest_by(points, |p| {
        let rel = p - points[p0];
        (rel - line_dir * rel.dot(&line_dir)).norm()
    });
    if line_dist < eps {
        return Simplex::Degenerate;
    }

    let plane_normal = (points[p1] - points[p0]).cross(&(points[p2] - points[p0])).normalize();
    let (p3, plane_dist) = farthest_by(points, |p| (p - points[p0]).dot(&plane_normal).abs());
    if plane_dist < eps {
        return Simplex::Planar([p0, p1, p2]);
    }

    Simplex::Solid([p0, p1, p2, p3])
}

#[allow(clippy::cast_possible_truncation)]
fn planar_hull(points: &[Vec3], seed: [usize; 3]) -> ConvexHull {
    let origin = points[seed[0]];
    let u = (points[seed[1]] - origin).normalize();
    let normal = u.cross(&(points[seed[2]] - origin)).normalize();
    let v = normal.cross(&u);

    let flat: Vec<Vec2> = points
        .iter()
        .map(|p| {
            let rel = p - origin;
            Vec2::new(rel.dot(&u), rel.dot(&v))
        })
        .collect();

    let vertices: Vec<Vec3> = convex_hull_2d_indices(&flat).into_iter().map(|i| points[i]).collect();
    let faces = (1..vertices.len().saturating_sub(1))
        .map(|i| [0, i as u32, i as u32 + 1])
        .collect();

    ConvexHull { vertices, faces }
}

fn face_normal(vertices: &[Vec3], face: &[u32; 3]) -> Vec3 {
    let a = vertices[face[0] as usize];
    let b = vertices[face[1] as usize];
    let c = vertices[face[2] as usize];
    (b - a).cross(&(c - a))
}

/// Convex hull of a point cloud.
///
/// Incremental construction starting from a tetrahedron. Coplanar clouds produce
/// a flat fan over their 2D hull; collinear or coincident clouds produce a
/// degenerate hull holding the input points and no faces.
#[allow(clippy::cast_possible_truncation)]
pub fn convex_hull_3d(points: &[Vec3]) -> ConvexHull {
    if points.len() < 3 {
        return ConvexHull { vertices: points.to_vec(), faces: Vec::new() };
    }

    let eps = tolerance(points);
    let seed = match initial_simplex(points, eps) {
        Simplex::Degenerate => return ConvexHull { vertices: points.to_vec(), faces: Vec::new() },
        Simplex::Planar(seed) => return planar_hull(points, seed),
        Simplex::Solid(seed) => seed,
    };

    let mut hull_verts: Vec<Vec3> = seed.iter().map(|&i| points[i]).collect();
    let mut hull_faces: Vec<[u32; 3]> = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];

    // Orient outward
    let center = hull_verts.iter().fold(Vec3::zeros(), |acc, p| acc + p) * 0.25;
    for face in &mut hull_faces {
        let n = face_normal(&hull_verts, face);
        if n.dot(&(hull_verts[face[0] as usize] - center)) < 0.0 {
            face.swap(1, 2);
        }
    }

    for (i, point) in points.iter().enumerate() {
        if seed.contains(&i) {
            continue;
        }

        let visible: Vec<usize> = hull_faces
            .iter()
            .enumerate()
            .filter(|(_, face)| {
                let n = face_normal(&hull_verts, face);
                n.dot(&(point - hull_verts[face[0] as usize])) > eps * n.norm()
            })
            .map(|(fi, _)| fi)
            .collect();

        if visible.is_empty() {
            continue;
        }

        // Horizon edges belong to exactly one visible face
        let mut horizon: Vec<(u32, u32)> = Vec::new();
        for &fi in &visible {
            let face = hull_faces[fi];
            for k in 0..3 {
                let (e0, e1) = (face[k], face[(k + 1) % 3]);
                let shared = visible.iter().any(|&fj| {
                    fj != fi && {
                        let other = hull_faces[fj];
                        (0..3).any(|m| other[m] == e1 && other[(m + 1) % 3] == e0)
                    }
                });
                if !shared {
                    horizon.push((e0, e1));
                }
            }
        }

        let mut sorted_visible = visible;
        sorted_visible.sort_unstable_by(|a, b| b.cmp(a));
        for fi in sorted_visible {
            hull_faces.swap_remove(fi);
        }

        let new_index = hull_verts.len() as u32;
        hull_verts.push(*point);
        hull_faces.extend(horizon.into_iter().map(|(e0, e1)| [e0, e1, new_index]));
    }

    compact(&hull_verts, &hull_faces)
}

/// Drop vertices no face references any more
#[allow(clippy::cast_possible_truncation)]
fn compact(vertices: &[Vec3], faces: &[[u32; 3]]) -> ConvexHull {
    let mut remap: Vec<Option<u32>> = vec![None; vertices.len()];
    let mut kept = Vec::new();
    let faces = faces
        .iter()
        .map(|face| {
            face.map(|index| {
                *remap[index as usize].get_or_insert_with(|| {
                    kept.push(vertices[index as usize]);
                    kept.len() as u32 - 1
                })
            })
        })
        .collect();

    ConvexHull { vertices: kept, faces }
}
