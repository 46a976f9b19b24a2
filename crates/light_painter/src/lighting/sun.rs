//! # Sun Direction Solving
//!
//! Suns and skies have no position worth deriving, only a direction. The plain
//! answer is the average stroke normal; with occlusion enabled a grid of
//! candidate directions around it is ranked by how many painted samples can
//! actually see the sky along each one.
//!
//! ## Spherical convention
//!
//! Longitude 0 points along world +Y, longitude 90° along +X, and latitude 90°
//! is world +Z for every longitude. The sky conversion uses the same azimuth
//! reference shifted by half a turn.

use crate::core::config::{SkySettings, SunSettings};
use crate::error::{PaintError, PaintResult};
use crate::foundation::math::{constants, rotation_between, utils, Vec3};
use crate::lighting::{SkyModelKind, SkyParameters, SkyTexture, SunLight};
use crate::report::Report;
use crate::scene::SceneQuery;
use crate::stroke::{average_normal, ResolvedStroke};

/// Sky models divide by the vertical component; keep it off zero
const MIN_SKY_Z: f32 = 0.0001;

/// Latitudes this close to a pole map onto the pole itself
const POLE_EPSILON: f32 = 1e-6;

/// Message reported when the solver falls back to the average normal
pub const NO_DIRECTION_FALLBACK: &str =
    "No valid directions found (add more samples or increase the elevation clamp!), using average normal";

/// Unit direction for a latitude/longitude pair in radians
pub fn geo_to_dir(latitude: f32, longitude: f32) -> Vec3 {
    if (latitude - constants::HALF_PI).abs() < POLE_EPSILON {
        return Vec3::z();
    }
    if (latitude + constants::HALF_PI).abs() < POLE_EPSILON {
        return -Vec3::z();
    }
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vec3::new(cos_lat * sin_lon, cos_lat * cos_lon, sin_lat)
}

/// Latitude and longitude of a direction, longitude wrapped into `[0, 2π)`
pub fn dir_to_geo(direction: &Vec3) -> (f32, f32) {
    let dir = direction.try_normalize(0.0).unwrap_or_else(Vec3::z);
    let latitude = utils::clamp(dir.z, -1.0, 1.0).asin();
    let longitude = dir.x.atan2(dir.y).rem_euclid(constants::TAU);
    (latitude, longitude)
}

/// Score of a candidate direction
#[allow(clippy::cast_precision_loss)]
pub fn calc_rank(dot: f32, visible_count: usize) -> f32 {
    (dot + 1.0) * visible_count as f32
}

/// Find the direction facing `preferred` that the most `points` can see along.
///
/// Samples `latitude_samples` elevations over `[0, elevation_clamp]` and
/// `2 * longitude_samples` azimuths around the full circle. Candidates facing
/// away from `preferred` are dropped; the rest are ranked with [`calc_rank`].
/// Equal ranks keep the first candidate in longitude-major order.
pub fn solve_sun_direction<F>(
    points: &[Vec3],
    preferred: &Vec3,
    elevation_clamp: f32,
    latitude_samples: usize,
    longitude_samples: usize,
    occluded: F,
) -> PaintResult<Vec3>
where
    F: Fn(&Vec3, &Vec3) -> bool,
{
    let latitudes = utils::linspace(0.0, elevation_clamp, latitude_samples);
    let longitudes = utils::linspace_exclusive(0.0, constants::TAU, longitude_samples * 2);

    let mut best: Option<(Vec3, f32)> = None;
    for &longitude in &longitudes {
        for &latitude in &latitudes {
            let candidate = geo_to_dir(latitude, longitude);
            let dot = candidate.dot(preferred);
            if dot <= 0.0 {
                continue;
            }

            let visible = points.iter().filter(|p| !occluded(*p, &candidate)).count();
            let rank = calc_rank(dot, visible);
            if best.map_or(true, |(_, b)| rank > b) {
                best = Some((candidate, rank));
            }
        }
    }

    log::trace!(
        "Sun solver tested {}x{} directions against {} samples",
        longitudes.len(),
        latitudes.len(),
        points.len()
    );

    best.map(|(direction, _)| direction).ok_or(PaintError::NoValidDirection)
}

/// Direction toward the sun for a resolved stroke set.
///
/// Falls back to the average normal, with a warning, when the occlusion solver
/// finds nothing admissible.
pub fn sun_direction(
    resolved: &ResolvedStroke,
    settings: &SunSettings,
    scene: &dyn SceneQuery,
) -> PaintResult<(Vec3, Option<Report>)> {
    let average = average_normal(&resolved.normals)?;
    if !settings.use_occlusion {
        return Ok((average, None));
    }

    let solved = solve_sun_direction(
        &resolved.positions,
        &average,
        settings.elevation_clamp,
        settings.latitude_samples as usize,
        settings.longitude_samples as usize,
        |origin, direction| scene.is_occluded(origin, direction, settings.max_distance),
    );

    match solved {
        Ok(direction) => Ok((direction, None)),
        Err(PaintError::NoValidDirection) => Ok((average, Some(Report::warning(NO_DIRECTION_FALLBACK)))),
        Err(err) => Err(err),
    }
}

/// Sun lamp shining back along the solved direction, anchored at the scene cursor
pub fn derive_sun(
    resolved: &ResolvedStroke,
    settings: &SunSettings,
    scene: &dyn SceneQuery,
) -> PaintResult<(SunLight, Option<Report>)> {
    let (direction, report) = sun_direction(resolved, settings, scene)?;
    let light = SunLight {
        location: scene.cursor_location(),
        rotation: rotation_between(&-Vec3::z(), &-direction),
        angle: settings.angle,
        energy: settings.power,
        color: settings.color,
        visibility: settings.visibility,
    };
    Ok((light, report))
}

/// Convert a direction toward the sun into a sky model's parameters
pub fn sky_parameters(direction: &Vec3, model: SkyModelKind) -> SkyParameters {
    match model {
        SkyModelKind::Nishita => {
            let z = if direction.z == 0.0 { MIN_SKY_Z } else { direction.z };
            let horizontal = direction.x.hypot(direction.y);
            SkyParameters::Nishita {
                sun_elevation: (horizontal / z).atan() + constants::HALF_PI,
                sun_rotation: direction.x.atan2(direction.y) + constants::PI,
            }
        }
        SkyModelKind::Preetham => SkyParameters::Preetham { sun_direction: *direction },
    }
}

/// Sky texture lit from the solved direction
pub fn derive_sky(
    resolved: &ResolvedStroke,
    sun: &SunSettings,
    sky: &SkySettings,
    scene: &dyn SceneQuery,
) -> PaintResult<(SkyTexture, Option<Report>)> {
    let (direction, report) = sun_direction(resolved, sun, scene)?;
    let texture = SkyTexture {
        parameters: sky_parameters(&direction, sky.model),
        sun_size: sky.sun_size,
        intensity: sky.intensity,
        visibility: sky.visibility,
    };
    Ok((texture, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportLevel;
    use crate::scene::MemoryScene;
    use crate::stroke::{resolve_axis, AxisMode, StrokePoint};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn floor_patch() -> ResolvedStroke {
        let points: Vec<StrokePoint> = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)]
            .iter()
            .map(|&(x, y)| StrokePoint::new(Vec3::new(x, y, 0.0), Vec3::z()))
            .collect();
        resolve_axis(&points, AxisMode::Normal, 0.0, &MemoryScene::new()).unwrap()
    }

    #[test]
    fn test_geo_to_dir_reference_points() {
        assert_relative_eq!(geo_to_dir(0.0, 0.0), Vec3::y(), epsilon = EPSILON);
        assert_relative_eq!(geo_to_dir(0.0, constants::HALF_PI), Vec3::x(), epsilon = EPSILON);
        for longitude in [0.0, 1.0, 2.5, 4.0] {
            assert_eq!(geo_to_dir(constants::HALF_PI, longitude), Vec3::z());
        }
    }

    #[test]
    fn test_geo_round_trip() {
        for (latitude, longitude) in [(0.3, 0.2), (-0.7, 3.0), (1.2, 5.9), (0.0, 0.0)] {
            let (lat, lon) = dir_to_geo(&geo_to_dir(latitude, longitude));
            assert_relative_eq!(lat, latitude, epsilon = 1e-4);
            assert_relative_eq!(lon, longitude, epsilon = 1e-4);
        }
        // Westward azimuths wrap into the positive range
        let (_, lon) = dir_to_geo(&Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(lon, 1.5 * constants::PI, epsilon = 1e-4);
    }

    #[test]
    fn test_rank_prefers_visibility_then_alignment() {
        assert!(calc_rank(0.1, 3) > calc_rank(1.0, 1));
        assert!(calc_rank(0.9, 2) > calc_rank(0.5, 2));
        assert_relative_eq!(calc_rank(-1.0, 10), 0.0);
    }

    #[test]
    fn test_solver_without_blockers_picks_most_aligned() {
        let points = vec![Vec3::zeros()];
        let preferred = geo_to_dir(42.0_f32.to_radians(), 0.0);
        let direction = solve_sun_direction(&points, &preferred, 60.0_f32.to_radians(), 7, 6, |_, _| false).unwrap();
        // Latitudes step by 10°: 40° at longitude 0 is the closest sample
        let (latitude, longitude) = dir_to_geo(&direction);
        assert_relative_eq!(longitude, 0.0, epsilon = 1e-4);
        assert_relative_eq!(latitude, 40.0_f32.to_radians(), epsilon = 1e-4);
    }

    #[test]
    fn test_solver_avoids_blocked_directions() {
        let points = vec![Vec3::zeros()];
        let preferred = Vec3::y();
        // Everything toward +X is blocked
        let direction =
            solve_sun_direction(&points, &preferred, 60.0_f32.to_radians(), 4, 4, |_, d| d.x > 0.1).unwrap();
        assert!(direction.x <= 0.1);
        assert!(direction.dot(&preferred) > 0.0);
    }

    #[test]
    fn test_solver_fails_when_nothing_faces_preferred() {
        // Straight down can never be reached from the upper hemisphere
        let result = solve_sun_direction(&[Vec3::zeros()], &-Vec3::z(), 0.0, 3, 4, |_, _| true);
        assert_eq!(result, Err(PaintError::NoValidDirection));
    }

    #[test]
    fn test_sun_direction_falls_back_to_average() {
        let mut resolved = floor_patch();
        resolved.normals = vec![-Vec3::z(); resolved.len()];
        let settings = SunSettings::new().with_elevation_clamp(0.0).with_samples(4, 3);

        let (direction, report) = sun_direction(&resolved, &settings, &MemoryScene::new()).unwrap();
        assert_relative_eq!(direction, -Vec3::z(), epsilon = EPSILON);
        let report = report.unwrap();
        assert_eq!(report.level, ReportLevel::Warning);
        assert_eq!(report.message, NO_DIRECTION_FALLBACK);
    }

    #[test]
    fn test_sun_avoids_wall() {
        let mut scene = MemoryScene::new();
        // Tall wall on the +Y side of the patch
        scene.add_quad(Vec3::new(0.0, 2.0, 0.0), Vec3::x() * 20.0, Vec3::z() * 20.0);
        let settings = SunSettings::new();

        let (direction, report) = sun_direction(&floor_patch(), &settings, &scene).unwrap();
        assert!(report.is_none());
        assert!(direction.y < 1e-3);
        assert!(direction.z > 0.0);
    }

    #[test]
    fn test_derive_sun_shines_onto_patch() {
        let scene = MemoryScene::new().with_cursor(Vec3::new(1.0, 2.0, 3.0));
        let settings = SunSettings::new().with_occlusion(false);
        let (sun, report) = derive_sun(&floor_patch(), &settings, &scene).unwrap();
        assert!(report.is_none());
        assert_relative_eq!(sun.location, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(sun.direction(), -Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_sky_parameters() {
        match sky_parameters(&Vec3::z(), SkyModelKind::Nishita) {
            SkyParameters::Nishita { sun_elevation, sun_rotation } => {
                assert_relative_eq!(sun_elevation, constants::HALF_PI, epsilon = EPSILON);
                assert_relative_eq!(sun_rotation, constants::PI, epsilon = EPSILON);
            }
            other => panic!("unexpected {other:?}"),
        }

        // Horizontal directions do not divide by zero
        match sky_parameters(&Vec3::x(), SkyModelKind::Nishita) {
            SkyParameters::Nishita { sun_elevation, sun_rotation } => {
                assert!(sun_elevation.is_finite());
                assert_relative_eq!(sun_rotation, 1.5 * constants::PI, epsilon = EPSILON);
            }
            other => panic!("unexpected {other:?}"),
        }

        let direction = Vec3::new(0.0, 0.6, 0.8);
        assert_eq!(
            sky_parameters(&direction, SkyModelKind::Preetham),
            SkyParameters::Preetham { sun_direction: direction }
        );
    }

    #[test]
    fn test_derive_sky_uses_settings() {
        let sun = SunSettings::new().with_occlusion(false);
        let sky = SkySettings::default().with_model(SkyModelKind::Preetham);
        let (texture, _) = derive_sky(&floor_patch(), &sun, &sky, &MemoryScene::new()).unwrap();
        assert_eq!(texture.parameters, SkyParameters::Preetham { sun_direction: Vec3::z() });
        assert_relative_eq!(texture.sun_size, sky.sun_size);
    }
}
