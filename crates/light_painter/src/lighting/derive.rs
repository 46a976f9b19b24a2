//! Point, spot and area lamp placement from resolved strokes
//!
//! All three start from the same frame: the negated average normal (the way a
//! lamp must face to light the patch), the patch flattened onto its back plane,
//! and the centroid of that flattened patch.

use crate::core::config::LampSettings;
use crate::error::{PaintError, PaintResult};
use crate::foundation::math::{
    angle_between, centroid, constants, rotation_between, utils, Quat, Vec3,
};
use crate::geometry::{flatten_to_back_plane, get_box};
use crate::lighting::{AreaLight, LampType, LightSpec, PointLight, SpotLight};
use crate::report::Report;
use crate::stroke::{average_normal, ResolvedStroke, StrokeCountMode};

/// Narrowest cone a spot lamp may have (1 degree)
pub const MIN_SPOT_SIZE: f32 = constants::PI / 180.0;

/// Power that keeps apparent brightness constant at `distance`.
///
/// Inverse-square compensation: `power * distance²`.
pub fn relative_power(power: f32, distance: f32) -> f32 {
    power * distance * distance
}

/// Energy for a lamp placed with `settings`
pub fn lamp_energy(settings: &LampSettings) -> f32 {
    if settings.relative_power {
        relative_power(settings.power, settings.offset)
    } else {
        settings.power
    }
}

/// Shared placement frame of point, spot and area lamps
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementFrame {
    /// Direction the lamp faces: toward the painted surface
    pub facing: Vec3,
    /// Positions flattened onto the back plane
    pub projected: Vec<Vec3>,
    /// Centroid of the flattened positions
    pub center: Vec3,
}

/// Build the placement frame for a resolved stroke set
pub fn placement_frame(resolved: &ResolvedStroke) -> PaintResult<PlacementFrame> {
    let facing = -average_normal(&resolved.normals)?;
    let projected = flatten_to_back_plane(&resolved.positions, &facing);
    let center = centroid(&projected).ok_or(PaintError::NoStrokes)?;
    Ok(PlacementFrame { facing, projected, center })
}

/// Point lamp at the centroid of the flattened patch
pub fn derive_point(resolved: &ResolvedStroke, settings: &LampSettings) -> PaintResult<PointLight> {
    let frame = placement_frame(resolved)?;
    Ok(PointLight {
        location: frame.center,
        radius: settings.radius,
        energy: lamp_energy(settings),
        color: settings.color,
        visibility: settings.visibility,
    })
}

/// Spot lamp whose cone covers every originally painted sample
pub fn derive_spot(resolved: &ResolvedStroke, settings: &LampSettings) -> PaintResult<SpotLight> {
    let frame = placement_frame(resolved)?;
    let rotation = rotation_between(&-Vec3::z(), &frame.facing);

    let original_center = centroid(&resolved.original_positions).ok_or(PaintError::NoStrokes)?;
    let cone_axis = (original_center - frame.center)
        .try_normalize(f32::EPSILON)
        .unwrap_or(frame.facing);

    let half_angle = resolved
        .original_positions
        .iter()
        .map(|p| angle_between(&(p - frame.center), &cone_axis))
        .fold(0.0_f32, f32::max);

    Ok(SpotLight {
        location: frame.center,
        rotation,
        spot_size: utils::clamp(half_angle * 2.0, MIN_SPOT_SIZE, constants::PI),
        spot_blend: settings.spot_blend,
        radius: settings.radius,
        energy: lamp_energy(settings),
        color: settings.color,
        visibility: settings.visibility,
    })
}

/// Area lamp covering the minimum bounding rectangle of the flattened patch
pub fn derive_area(resolved: &ResolvedStroke, settings: &LampSettings) -> PaintResult<AreaLight> {
    let frame = placement_frame(resolved)?;
    let rect = get_box(&frame.projected, &frame.facing).ok_or(PaintError::NoStrokes)?;

    let [min_x, min_y] = settings.min_area_size;
    let (size, size_y) = if settings.area_shape.is_uniform() {
        let size = rect.length.max(rect.width).max(min_x).max(min_y);
        (size, size)
    } else {
        (rect.length.max(min_x), rect.width.max(min_y))
    };

    // Area lamps emit along their local -Z
    let flip = Quat::from_axis_angle(&Vec3::x_axis(), constants::PI);
    let rotation = Quat::from_rotation_matrix(&rect.rotation) * flip;

    Ok(AreaLight {
        location: rect.center,
        rotation,
        shape: settings.area_shape,
        size,
        size_y,
        spread: settings.area_spread,
        energy: lamp_energy(settings),
        color: settings.color,
        visibility: settings.visibility,
    })
}

/// Derive the lamp kind selected in the settings
pub fn derive_lamp(
    lamp_type: LampType,
    resolved: &ResolvedStroke,
    settings: &LampSettings,
) -> PaintResult<LightSpec> {
    Ok(match lamp_type {
        LampType::Point => LightSpec::Point(derive_point(resolved, settings)?),
        LampType::Spot => LightSpec::Spot(derive_spot(resolved, settings)?),
        LampType::Area => LightSpec::Area(derive_area(resolved, settings)?),
    })
}

/// Results of a derivation run, with everything worth telling the user
#[derive(Debug, Clone, PartialEq)]
pub struct Derived<T> {
    /// One item in ONE mode, up to one per stroke otherwise
    pub items: Vec<T>,
    /// Fallbacks and per-stroke failures
    pub reports: Vec<Report>,
    last_error: Option<PaintError>,
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Self { items: Vec::new(), reports: Vec::new(), last_error: None }
    }
}

impl<T> Derived<T> {
    /// Turn a run where every attempt failed into that run's last error.
    ///
    /// A run over no strokes at all stays `Ok` with no items.
    pub fn require_items(self) -> PaintResult<Self> {
        match self.last_error {
            Some(err) if self.items.is_empty() => Err(err),
            _ => Ok(self),
        }
    }
}

fn record_failure<T>(derived: &mut Derived<T>, err: PaintError, report: Report) {
    derived.reports.push(report);
    derived.last_error = Some(err);
}

fn derive_each<T, F>(strokes: &[ResolvedStroke], derive: &F, derived: &mut Derived<T>) -> PaintResult<()>
where
    F: Fn(&ResolvedStroke) -> PaintResult<T>,
{
    for stroke in strokes {
        match derive(stroke) {
            Ok(item) => derived.items.push(item),
            Err(err) if err.is_recoverable() => {
                let report = Report::from(&err);
                record_failure(derived, err, report);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Run `derive` over pooled or per-stroke geometry.
///
/// A recoverable failure on the pooled attempt is reported and retried once per
/// stroke; failing strokes are reported and skipped. Unrecoverable errors abort.
/// Callers that need at least one result chain [`Derived::require_items`].
pub fn derive_with_fallback<T, F>(
    mode: StrokeCountMode,
    strokes: &[ResolvedStroke],
    derive: F,
) -> PaintResult<Derived<T>>
where
    F: Fn(&ResolvedStroke) -> PaintResult<T>,
{
    let mut derived = Derived::default();

    match mode {
        StrokeCountMode::PerStroke => derive_each(strokes, &derive, &mut derived)?,
        StrokeCountMode::One => match derive(&ResolvedStroke::pooled(strokes)) {
            Ok(item) => derived.items.push(item),
            Err(err) if err.is_recoverable() => {
                let report = Report::warning(format!("{err} Changing light count to per stroke."));
                record_failure(&mut derived, err, report);
                derive_each(strokes, &derive, &mut derived)?;
            }
            Err(err) => return Err(err),
        },
    }

    Ok(derived)
}
