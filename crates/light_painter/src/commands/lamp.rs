//! Point, spot and area lamp tool

use crate::commands::{
    delete_lights, handle_common_command, require_camera, sync_lights, CommandOutcome, PaintTool, ToolControl,
};
use crate::core::config::LampSettings;
use crate::error::PaintResult;
use crate::lighting::{derive_lamp, derive_with_fallback, LampType, LightSpec, PointLight};
use crate::report::Report;
use crate::scene::{LightHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeSource};

/// Paints point, spot or area lamps
#[derive(Debug, Clone)]
pub struct LampCommand {
    /// Tool settings
    pub settings: LampSettings,
    lights: Vec<LightHandle>,
}

impl LampCommand {
    /// Create the tool
    pub fn new(settings: LampSettings) -> Self {
        Self { settings, lights: Vec::new() }
    }

    /// Lights currently owned by the tool
    pub fn lights(&self) -> &[LightHandle] {
        &self.lights
    }
}

impl PaintTool for LampCommand {
    fn name(&self) -> &'static str {
        "Paint Lamp"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        require_camera(self.settings.axis, scene.as_query())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        let placeholder = LightSpec::Point(PointLight {
            location: scene.cursor_location(),
            radius: self.settings.radius,
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
        let resolved = get_strokes_with_normals(strokes, settings.axis, settings.offset, scene.as_query())?;
        let derived = derive_with_fallback(settings.count_mode, &resolved, |stroke| {
            derive_lamp(settings.lamp_type, stroke, settings)
        })?
        .require_items()?;

        sync_lights(scene, &mut self.lights, derived.items)?;
        Ok(derived.reports)
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        delete_lights(scene, &mut self.lights)
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome { lights: self.lights.clone(), ..CommandOutcome::default() }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::TypeToggle => {
                self.settings.lamp_type = self.settings.lamp_type.next();
                ToolControl::Rerun
            }
            PaintCommand::RelativePowerToggle => {
                self.settings.relative_power = !self.settings.relative_power;
                ToolControl::Rerun
            }
            PaintCommand::OffsetMode => ToolControl::Drag(DragAttr::Offset),
            // Area lamps have no radius
            PaintCommand::SizeMode if self.settings.lamp_type != LampType::Area => ToolControl::Drag(DragAttr::Radius),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::Power),
            other => handle_common_command(other, &mut self.settings.axis, &mut self.settings.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::Offset => Some(self.settings.offset),
            DragAttr::Radius => Some(self.settings.radius),
            DragAttr::Power => Some(self.settings.power),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::Offset => self.settings.offset = value,
            DragAttr::Radius => self.settings.radius = value,
            DragAttr::Power => self.settings.power = value,
            _ => {}
        }
    }
}
