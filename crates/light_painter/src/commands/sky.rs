//! Sky texture tool

use crate::commands::{handle_common_command, require_camera, CommandOutcome, PaintTool, ToolControl};
use crate::core::config::{SkySettings, SunSettings};
use crate::error::PaintResult;
use crate::foundation::math::Vec3;
use crate::lighting::sun::sky_parameters;
use crate::lighting::{derive_sky, derive_with_fallback, LightSpec, SkyModelKind, SkyTexture};
use crate::report::Report;
use crate::scene::{LightHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeCountMode, StrokeSource};

/// Drives a sky texture's sun from painted strokes
#[derive(Debug, Clone)]
pub struct SkyCommand {
    /// Direction solving settings, shared with the sun tool
    pub sun: SunSettings,
    /// Sky appearance
    pub sky: SkySettings,
    light: Option<LightHandle>,
}

impl SkyCommand {
    /// Create the tool
    pub fn new(sun: SunSettings, sky: SkySettings) -> Self {
        Self { sun, sky, light: None }
    }
}

impl PaintTool for SkyCommand {
    fn name(&self) -> &'static str {
        "Paint Sky"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        require_camera(self.sun.axis, scene.as_query())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        let placeholder = LightSpec::Sky(SkyTexture {
            parameters: sky_parameters(&Vec3::z(), self.sky.model),
            sun_size: self.sky.sun_size,
            intensity: self.sky.intensity,
            visibility: self.sky.visibility,
        });
        self.light = Some(scene.create_light(placeholder));
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        let Some(light) = self.light else {
            return Ok(Vec::new());
        };
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }

        let query = scene.as_query();
        let resolved = get_strokes_with_normals(strokes, self.sun.axis, 0.0, query)?;
        let derived = derive_with_fallback(StrokeCountMode::One, &resolved, |stroke| {
            derive_sky(stroke, &self.sun, &self.sky, query)
        })?
        .require_items()?;

        let mut reports = derived.reports;
        if let Some((texture, report)) = derived.items.into_iter().next() {
            reports.extend(report);
            scene.update_light(light, LightSpec::Sky(texture))?;
        }
        Ok(reports)
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.light.take().map_or(Ok(()), |light| scene.delete_light(light))
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome { lights: self.light.into_iter().collect(), ..CommandOutcome::default() }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::TypeToggle => {
                self.sky.model = match self.sky.model {
                    SkyModelKind::Nishita => SkyModelKind::Preetham,
                    SkyModelKind::Preetham => SkyModelKind::Nishita,
                };
                ToolControl::Rerun
            }
            PaintCommand::SizeMode => ToolControl::Drag(DragAttr::SunSize),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::Intensity),
            other => handle_common_command(other, &mut self.sun.axis, &mut self.sky.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::SunSize => Some(self.sky.sun_size),
            DragAttr::Intensity => Some(self.sky.intensity),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::SunSize => self.sky.sun_size = value,
            DragAttr::Intensity => self.sky.intensity = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants;
    use crate::lighting::SkyParameters;
    use crate::scene::{MemoryScene, SceneSink};
    use crate::stroke::{Stroke, StrokeCollection, StrokePoint};
    use approx::assert_relative_eq;

    fn wall_patch() -> StrokeCollection {
        let points = [(0.0, 0.0), (0.0, 0.5), (0.5, 0.5)]
            .iter()
            .map(|&(y, z)| StrokePoint::new(Vec3::new(0.0, y, z), Vec3::x()))
            .collect();
        StrokeCollection::from_strokes(vec![Stroke::from_points(points)])
    }

    fn tool() -> SkyCommand {
        SkyCommand::new(SunSettings::default().with_occlusion(false), SkySettings::default())
    }

    #[test]
    fn test_wall_facing_x_puts_sun_on_horizon() {
        let mut scene = MemoryScene::new();
        let outcome = tool().execute(&wall_patch(), &mut scene).unwrap();
        assert!(outcome.reports.is_empty());

        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Sky(sky)) => match sky.parameters {
                SkyParameters::Nishita { sun_elevation, sun_rotation } => {
                    // Horizontal sun: z is nudged off zero, so atan saturates
                    assert_relative_eq!(sun_elevation, constants::PI, epsilon = 1e-3);
                    assert_relative_eq!(sun_rotation, constants::HALF_PI + constants::PI, epsilon = 1e-5);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_type_toggle_switches_model() {
        let mut scene = MemoryScene::new();
        let mut tool = tool();
        let light = tool.execute(&wall_patch(), &mut scene).unwrap().lights[0];

        assert_eq!(tool.handle_command(PaintCommand::TypeToggle), ToolControl::Rerun);
        tool.update(&wall_patch(), &mut scene).unwrap();
        match scene.light_spec(light) {
            Some(LightSpec::Sky(sky)) => {
                assert_eq!(sky.parameters, SkyParameters::Preetham { sun_direction: Vec3::x() });
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_size_and_intensity_drags() {
        let mut tool = tool();
        assert_eq!(tool.handle_command(PaintCommand::SizeMode), ToolControl::Drag(DragAttr::SunSize));
        assert_eq!(tool.handle_command(PaintCommand::PowerMode), ToolControl::Drag(DragAttr::Intensity));
        tool.set_drag_value(DragAttr::Intensity, 0.5);
        assert_eq!(tool.drag_value(DragAttr::Intensity), Some(0.5));
    }

    #[test]
    fn test_rollback_removes_sky() {
        let mut scene = MemoryScene::new();
        let mut tool = tool();
        tool.execute(&wall_patch(), &mut scene).unwrap();
        tool.rollback(&mut scene).unwrap();
        assert_eq!(scene.light_count(), 0);
    }
}
