//! Math utilities and types
//!
//! Provides the fundamental math types used by the stroke and light inference code.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3,
    Quaternion,
    Rotation3,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Rotation matrix type
pub type Rot3 = Rotation3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Shortest-arc rotation taking `from` onto `to`.
///
/// Unlike `UnitQuaternion::rotation_between`, anti-parallel inputs still yield a
/// half turn (about an arbitrary axis perpendicular to `from`). Zero-length inputs
/// give the identity.
pub fn rotation_between(from: &Vec3, to: &Vec3) -> Quat {
    if let Some(rotation) = Quat::rotation_between(from, to) {
        return rotation;
    }

    // Only reached for opposite directions
    let fallback = if from.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let axis = Unit::new_normalize(from.cross(&fallback));
    Quat::from_axis_angle(&axis, constants::PI)
}

/// Vector projection of `v` onto `axis`. Returns zero for a zero axis.
pub fn project_onto(v: &Vec3, axis: &Vec3) -> Vec3 {
    let len_sq = axis.norm_squared();
    if len_sq == 0.0 {
        return Vec3::zeros();
    }
    axis * (v.dot(axis) / len_sq)
}

/// Angle between two vectors in radians, 0 when either is zero-length.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
    if a.norm_squared() == 0.0 || b.norm_squared() == 0.0 {
        return 0.0;
    }
    a.angle(b)
}

/// Arithmetic mean of a point set, `None` when empty.
pub fn centroid(points: &[Vec3]) -> Option<Vec3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec3::zeros(), |acc, p| acc + p);
    #[allow(clippy::cast_precision_loss)]
    Some(sum / points.len() as f32)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// `count` evenly spaced values over `[start, stop]`, both ends included.
    #[allow(clippy::cast_precision_loss)]
    pub fn linspace(start: f32, stop: f32, count: usize) -> Vec<f32> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f32;
                (0..count).map(|i| start + step * i as f32).collect()
            }
        }
    }

    /// `count` evenly spaced values over `[start, stop)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn linspace_exclusive(start: f32, stop: f32, count: usize) -> Vec<f32> {
        if count == 0 {
            return Vec::new();
        }
        let step = (stop - start) / count as f32;
        (0..count).map(|i| start + step * i as f32).collect()
    }

    /// Round to a number of decimal places, negative places round to tens, hundreds...
    pub fn round_to(value: f32, places: i32) -> f32 {
        let scale = 10f32.powi(places);
        (value * scale).round() / scale
    }

    /// True when `a` and `b` agree to within a relative tolerance.
    pub fn is_close(a: f32, b: f32, rel_tol: f32) -> bool {
        (a - b).abs() <= rel_tol * a.abs().max(b.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_rotation_between_maps_vectors() {
        let from = Vec3::new(0.0, 0.0, -1.0);
        let to = Vec3::new(-1.0, 0.0, 0.0);
        let rotated = rotation_between(&from, &to) * from;
        assert_relative_eq!(rotated, to, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_between_opposite_vectors() {
        let from = Vec3::z();
        let to = -Vec3::z();
        let rotated = rotation_between(&from, &to) * from;
        assert_relative_eq!(rotated, to, epsilon = EPSILON);
    }

    #[test]
    fn test_project_onto() {
        let v = Vec3::new(3.0, 4.0, 5.0);
        assert_relative_eq!(project_onto(&v, &Vec3::new(0.0, 0.0, 2.0)), Vec3::new(0.0, 0.0, 5.0), epsilon = EPSILON);
        assert_eq!(project_onto(&v, &Vec3::zeros()), Vec3::zeros());
    }

    #[test]
    fn test_linspace_endpoints() {
        let inclusive = utils::linspace(0.0, 1.0, 3);
        assert_eq!(inclusive.len(), 3);
        assert_relative_eq!(inclusive[2], 1.0, epsilon = EPSILON);

        let exclusive = utils::linspace_exclusive(0.0, constants::TAU, 4);
        assert_eq!(exclusive.len(), 4);
        assert_relative_eq!(exclusive[1], constants::HALF_PI, epsilon = EPSILON);
        assert!(utils::linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(utils::linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(utils::round_to(1.26, 1), 1.3, epsilon = EPSILON);
        assert_relative_eq!(utils::round_to(1.26, 0), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());
        let c = centroid(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 2.0, 0.0)]).unwrap();
        assert_relative_eq!(c, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }
}
