//! Re-aims an existing lamp at freshly painted strokes

use crate::commands::{handle_common_command, require_camera, CommandOutcome, PaintTool, ToolControl};
use crate::core::config::{LampSettings, SunSettings};
use crate::error::{PaintError, PaintResult};
use crate::lighting::{derive_lamp, derive_sun, derive_with_fallback, LampType, LightKind, LightSpec};
use crate::report::Report;
use crate::scene::{LightHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeCountMode, StrokeSource};

const NOT_A_LAMP: &str = "Select a lamp to adjust!";

/// Adjusts a point, spot, area or sun lamp in place
#[derive(Debug, Clone)]
pub struct LampAdjustCommand {
    /// Placement and power settings for point, spot and area lamps
    pub lamp: LampSettings,
    /// Direction and appearance settings for sun lamps
    pub sun: SunSettings,
    target: LightHandle,
    kind: Option<LightKind>,
    saved: Option<LightSpec>,
}

impl LampAdjustCommand {
    /// Adjust the lamp behind `target`
    pub fn new(target: LightHandle, lamp: LampSettings, sun: SunSettings) -> Self {
        Self { lamp, sun, target, kind: None, saved: None }
    }

    fn is_sun(&self) -> bool {
        self.kind == Some(LightKind::Sun)
    }

    /// Pull the lamp's current appearance into the tool settings
    fn read_settings(&mut self, spec: &LightSpec) {
        let offset_sq = self.lamp.offset * self.lamp.offset;
        let stored_power = |energy: f32, relative: bool| {
            if relative && offset_sq > 0.0 { energy / offset_sq } else { energy }
        };

        match spec {
            LightSpec::Point(light) => {
                self.lamp.lamp_type = LampType::Point;
                self.lamp.radius = light.radius;
                self.lamp.power = stored_power(light.energy, self.lamp.relative_power);
                self.lamp.color = light.color;
                self.lamp.visibility = light.visibility;
            }
            LightSpec::Spot(light) => {
                self.lamp.lamp_type = LampType::Spot;
                self.lamp.radius = light.radius;
                self.lamp.spot_blend = light.spot_blend;
                self.lamp.power = stored_power(light.energy, self.lamp.relative_power);
                self.lamp.color = light.color;
                self.lamp.visibility = light.visibility;
            }
            LightSpec::Area(light) => {
                self.lamp.lamp_type = LampType::Area;
                self.lamp.area_shape = light.shape;
                self.lamp.area_spread = light.spread;
                self.lamp.power = stored_power(light.energy, self.lamp.relative_power);
                self.lamp.color = light.color;
                self.lamp.visibility = light.visibility;
            }
            LightSpec::Sun(light) => {
                self.sun.angle = light.angle;
                self.sun.power = light.energy;
                self.sun.color = light.color;
                self.sun.visibility = light.visibility;
            }
            _ => {}
        }
    }
}

impl PaintTool for LampAdjustCommand {
    fn name(&self) -> &'static str {
        "Adjust Lamp"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        match scene.light_spec(self.target) {
            Some(spec) if spec.is_lamp() => require_camera(self.lamp.axis, scene.as_query()),
            _ => Err(PaintError::InvalidSelection(NOT_A_LAMP.to_string())),
        }
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        let spec = scene
            .light_spec(self.target)
            .cloned()
            .ok_or_else(|| PaintError::InvalidSelection(NOT_A_LAMP.to_string()))?;
        self.kind = Some(spec.kind());
        self.read_settings(&spec);
        self.saved = Some(spec);
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }
        let query = scene.as_query();
        let resolved = get_strokes_with_normals(strokes, self.lamp.axis, self.lamp.offset, query)?;

        let (spec, reports) = if self.is_sun() {
            let derived = derive_with_fallback(StrokeCountMode::One, &resolved, |stroke| {
                derive_sun(stroke, &self.sun, query)
            })?
            .require_items()?;
            let mut reports = derived.reports;
            let spec = derived.items.into_iter().next().map(|(mut sun, report)| {
                // Suns only turn; keep the anchor
                if let Some(LightSpec::Sun(saved)) = &self.saved {
                    sun.location = saved.location;
                }
                reports.extend(report);
                LightSpec::Sun(sun)
            });
            (spec, reports)
        } else {
            let derived = derive_with_fallback(StrokeCountMode::One, &resolved, |stroke| {
                derive_lamp(self.lamp.lamp_type, stroke, &self.lamp)
            })?
            .require_items()?;
            (derived.items.into_iter().next(), derived.reports)
        };

        if let Some(spec) = spec {
            scene.update_light(self.target, spec)?;
        }
        Ok(reports)
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        match self.saved.take() {
            Some(spec) => scene.update_light(self.target, spec),
            None => Ok(()),
        }
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome { lights: vec![self.target], ..CommandOutcome::default() }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        let is_sun = self.is_sun();
        match command {
            PaintCommand::OffsetMode => ToolControl::Drag(DragAttr::Offset),
            PaintCommand::SizeMode if is_sun => ToolControl::Drag(DragAttr::SunAngle),
            PaintCommand::SizeMode if self.lamp.lamp_type != LampType::Area => ToolControl::Drag(DragAttr::Radius),
            PaintCommand::PowerMode if is_sun => ToolControl::Drag(DragAttr::SunPower),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::Power),
            PaintCommand::RelativePowerToggle if !is_sun => {
                self.lamp.relative_power = !self.lamp.relative_power;
                ToolControl::Rerun
            }
            other if is_sun => handle_common_command(other, &mut self.lamp.axis, &mut self.sun.visibility),
            other => handle_common_command(other, &mut self.lamp.axis, &mut self.lamp.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::Offset => Some(self.lamp.offset),
            DragAttr::Radius => Some(self.lamp.radius),
            DragAttr::Power => Some(self.lamp.power),
            DragAttr::SunAngle => Some(self.sun.angle),
            DragAttr::SunPower => Some(self.sun.power),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::Offset => self.lamp.offset = value,
            DragAttr::Radius => self.lamp.radius = value,
            DragAttr::Power => self.lamp.power = value,
            DragAttr::SunAngle => self.sun.angle = value,
            DragAttr::SunPower => self.sun.power = value,
            _ => {}
        }
    }
}
