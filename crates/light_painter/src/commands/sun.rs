//! Sun lamp tool

use crate::commands::{
    delete_lights, handle_common_command, require_camera, sync_lights, CommandOutcome, PaintTool, ToolControl,
};
use crate::core::config::SunSettings;
use crate::error::PaintResult;
use crate::foundation::math::Quat;
use crate::lighting::{derive_sun, derive_with_fallback, LightSpec, SunLight};
use crate::report::Report;
use crate::scene::{LightHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeCountMode, StrokeSource};

/// Aims a sun so the painted patch is lit and, with occlusion solving, unshadowed
#[derive(Debug, Clone)]
pub struct SunCommand {
    /// Tool settings
    pub settings: SunSettings,
    lights: Vec<LightHandle>,
}

impl SunCommand {
    /// Create the tool
    pub fn new(settings: SunSettings) -> Self {
        Self { settings, lights: Vec::new() }
    }
}

impl PaintTool for SunCommand {
    fn name(&self) -> &'static str {
        "Paint Sun"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        require_camera(self.settings.axis, scene.as_query())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        let placeholder = LightSpec::Sun(SunLight {
            location: scene.cursor_location(),
            rotation: Quat::identity(),
            angle: self.settings.angle,
            energy: self.settings.power,
            color: self.settings.color,
            visibility: self.settings.visibility,
        });
        self.lights.push(scene.create_light(placeholder));
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }
        let settings = &self.settings;
        let query = scene.as_query();
        let resolved = get_strokes_with_normals(strokes, settings.axis, 0.0, query)?;
        let derived = derive_with_fallback(StrokeCountMode::One, &resolved, |stroke| {
            derive_sun(stroke, settings, query)
        })?
        .require_items()?;

        let mut reports = derived.reports;
        let specs = derived
            .items
            .into_iter()
            .map(|(sun, report)| {
                reports.extend(report);
                LightSpec::Sun(sun)
            })
            .collect();

        sync_lights(scene, &mut self.lights, specs)?;
        Ok(reports)
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        delete_lights(scene, &mut self.lights)
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome { lights: self.lights.clone(), ..CommandOutcome::default() }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::SizeMode => ToolControl::Drag(DragAttr::SunAngle),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::SunPower),
            other => handle_common_command(other, &mut self.settings.axis, &mut self.settings.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::SunAngle => Some(self.settings.angle),
            DragAttr::SunPower => Some(self.settings.power),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::SunAngle => self.settings.angle = value,
            DragAttr::SunPower => self.settings.power = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::lighting::sun::NO_DIRECTION_FALLBACK;
    use crate::report::ReportLevel;
    use crate::scene::{MemoryScene, SceneSink};
    use crate::stroke::{Stroke, StrokeCollection, StrokePoint};
    use approx::assert_relative_eq;

    fn floor_patch() -> StrokeCollection {
        let points = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)]
            .iter()
            .map(|&(x, y)| StrokePoint::new(Vec3::new(x, y, 0.0), Vec3::z()))
            .collect();
        StrokeCollection::from_strokes(vec![Stroke::from_points(points)])
    }

    #[test]
    fn test_sun_shines_down_on_unblocked_floor() {
        let mut scene = MemoryScene::new().with_cursor(Vec3::new(0.0, 0.0, 5.0));
        let settings = SunSettings::default().with_occlusion(false);

        let outcome = SunCommand::new(settings).execute(&floor_patch(), &mut scene).unwrap();
        assert_eq!(outcome.lights.len(), 1);
        assert!(outcome.reports.is_empty());
        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Sun(sun)) => {
                assert_relative_eq!(sun.direction(), -Vec3::z(), epsilon = 1e-5);
                assert_relative_eq!(sun.location, Vec3::new(0.0, 0.0, 5.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_horizon_only_search_falls_back_with_warning() {
        let mut scene = MemoryScene::new();
        let settings = SunSettings::default().with_elevation_clamp(0.0);

        let outcome = SunCommand::new(settings).execute(&floor_patch(), &mut scene).unwrap();
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].level, ReportLevel::Warning);
        assert_eq!(outcome.reports[0].message, NO_DIRECTION_FALLBACK);
        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Sun(sun)) => assert_relative_eq!(sun.direction(), -Vec3::z(), epsilon = 1e-5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_size_and_power_drags() {
        let mut tool = SunCommand::new(SunSettings::default());
        assert_eq!(tool.handle_command(PaintCommand::SizeMode), ToolControl::Drag(DragAttr::SunAngle));
        assert_eq!(tool.handle_command(PaintCommand::PowerMode), ToolControl::Drag(DragAttr::SunPower));
        assert_eq!(tool.handle_command(PaintCommand::OffsetMode), ToolControl::Ignored);
        tool.set_drag_value(DragAttr::SunPower, 3.0);
        assert_eq!(tool.drag_value(DragAttr::SunPower), Some(3.0));
    }
}
