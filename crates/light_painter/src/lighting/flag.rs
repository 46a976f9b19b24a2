//! Shadow card placement
//!
//! A flag is a card hanging between a lamp and the painted patch. Its outline is
//! the painted patch pulled toward every point of the lamp's emitter.

use crate::core::config::FlagSettings;
use crate::error::{PaintError, PaintResult};
use crate::foundation::math::{utils, Vec3};
use crate::lighting::LightSpec;

/// Factors this close to 1 leave the card on the surface
const FACTOR_TOLERANCE: f32 = 1e-6;

/// Points a card must shadow for `light`: area lamp corners or the lamp location
pub fn light_points(light: &LightSpec) -> PaintResult<Vec<Vec3>> {
    match light {
        LightSpec::Area(area) => Ok(area.corners().to_vec()),
        other => other
            .location()
            .map(|location| vec![location])
            .ok_or_else(|| PaintError::InvalidSelection(format!("{:?} lights cannot be flagged", other.kind()))),
    }
}

/// Card vertices for painted `vertices` shadowing `light`.
///
/// Sun cards float `sun_offset` in front of the patch toward the sun. For any
/// other lamp each vertex is pulled toward each light point by `factor`, which
/// moves the card from the lamp (0) to the surface (1).
pub fn flag_points(vertices: &[Vec3], light: &LightSpec, settings: &FlagSettings) -> PaintResult<Vec<Vec3>> {
    if let LightSpec::Sun(sun) = light {
        let toward_sun = -sun.direction();
        return Ok(vertices.iter().map(|v| v + toward_sun * settings.sun_offset).collect());
    }

    let sources = light_points(light)?;
    if utils::is_close(settings.factor, 1.0, FACTOR_TOLERANCE) {
        return Ok(vertices.to_vec());
    }

    Ok(vertices
        .iter()
        .flat_map(|v| sources.iter().map(move |light| light + (v - light) * settings.factor))
        .collect())
}
