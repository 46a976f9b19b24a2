//! # Paint Commands
//!
//! One tool per light type. Every tool follows the same lifecycle:
//!
//! 1. `preflight` rejects setups that cannot work (missing camera or selection)
//!    before anything is written to the scene
//! 2. `startup` creates placeholder objects
//! 3. `update` runs one inference pass over the current strokes
//! 4. `rollback` removes or restores whatever the tool touched
//!
//! Interactive sessions drive these steps event by event; [`PaintTool::execute`]
//! runs them once over a literal stroke set.

pub mod lamp;
pub mod lamp_adjust;
pub mod mesh;
pub mod tube;
pub mod sun;
pub mod sky;
pub mod flag;

use crate::error::{PaintError, PaintResult};
use crate::lighting::{LightSpec, RayVisibility};
use crate::report::Report;
use crate::scene::{LightHandle, MeshHandle, Scene, SceneQuery};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{AxisMode, StrokeSource};

pub use flag::FlagCommand;
pub use lamp::LampCommand;
pub use lamp_adjust::LampAdjustCommand;
pub use mesh::MeshCommand;
pub use sky::SkyCommand;
pub use sun::SunCommand;
pub use tube::TubeLightCommand;

/// What a tool did with a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolControl {
    /// Not a command this tool uses
    Ignored,
    /// Settings changed, run another pass
    Rerun,
    /// Start dragging an attribute
    Drag(DragAttr),
}

/// Scene objects a command produced, plus everything reported along the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    /// Lights created or updated
    pub lights: Vec<LightHandle>,
    /// Meshes created or updated
    pub meshes: Vec<MeshHandle>,
    /// Fallbacks and failures
    pub reports: Vec<Report>,
}

/// A light painting tool
pub trait PaintTool {
    /// Display name
    fn name(&self) -> &'static str;

    /// Check the setup before touching the scene
    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        let _ = scene;
        Ok(())
    }

    /// Create placeholder objects
    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()>;

    /// Run one inference pass over `strokes`.
    ///
    /// Recoverable problems come back as reports, unless every stroke failed, in
    /// which case the last failure is returned. An empty stroke set is a no-op.
    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>>;

    /// Undo everything since `startup`
    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()>;

    /// Objects currently owned by the tool
    fn outcome(&self) -> CommandOutcome;

    /// React to a keyboard command
    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        let _ = command;
        ToolControl::Ignored
    }

    /// Current value of a draggable attribute
    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        let _ = attr;
        None
    }

    /// Set a draggable attribute
    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        let _ = (attr, value);
    }

    /// Run the whole lifecycle once over a literal stroke set.
    ///
    /// A failing pass is rolled back so the scene is left as it was found.
    fn execute(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<CommandOutcome> {
        if !strokes.has_strokes() {
            return Err(PaintError::NoStrokes);
        }
        self.preflight(&*scene)?;
        self.startup(scene)?;

        match self.update(strokes, scene) {
            Ok(reports) => {
                log::info!("{} finished with {} report(s)", self.name(), reports.len());
                let mut outcome = self.outcome();
                outcome.reports = reports;
                Ok(outcome)
            }
            Err(err) => {
                log::error!("{} failed: {err}", self.name());
                if let Err(rollback_err) = self.rollback(scene) {
                    log::warn!("Rollback of {} incomplete: {rollback_err}", self.name());
                }
                Err(err)
            }
        }
    }
}

/// Fail with [`PaintError::MissingCamera`] when `axis` needs a camera the scene lacks
pub fn require_camera(axis: AxisMode, scene: &dyn SceneQuery) -> PaintResult<()> {
    if axis.needs_camera() && scene.camera_position().is_none() {
        return Err(PaintError::MissingCamera);
    }
    Ok(())
}

/// Apply an axis key to `axis`, returning whether it was one
pub fn apply_axis_command(command: PaintCommand, axis: &mut AxisMode) -> bool {
    let pressed = match command {
        PaintCommand::AxisX => AxisMode::X,
        PaintCommand::AxisY => AxisMode::Y,
        PaintCommand::AxisZ => AxisMode::Z,
        PaintCommand::AxisReflect => AxisMode::Reflect,
        _ => return false,
    };
    *axis = axis.toggle(pressed);
    true
}

/// Apply a visibility key to `visibility`, returning whether it was one
pub fn apply_visibility_command(command: PaintCommand, visibility: &mut RayVisibility) -> bool {
    let ray = match command {
        PaintCommand::VisibilityToggleCamera => RayVisibility::CAMERA,
        PaintCommand::VisibilityToggleDiffuse => RayVisibility::DIFFUSE,
        PaintCommand::VisibilityToggleSpecular => RayVisibility::SPECULAR,
        PaintCommand::VisibilityToggleVolume => RayVisibility::VOLUME,
        _ => return false,
    };
    *visibility = visibility.toggled(ray);
    true
}

/// Axis and visibility keys shared by every tool
pub fn handle_common_command(command: PaintCommand, axis: &mut AxisMode, visibility: &mut RayVisibility) -> ToolControl {
    if apply_axis_command(command, axis) || apply_visibility_command(command, visibility) {
        ToolControl::Rerun
    } else {
        ToolControl::Ignored
    }
}

/// Make `handles` match `specs`: update in place, create extras, delete leftovers.
///
/// An empty `specs` leaves the scene alone.
pub fn sync_lights(scene: &mut dyn Scene, handles: &mut Vec<LightHandle>, specs: Vec<LightSpec>) -> PaintResult<()> {
    if specs.is_empty() {
        return Ok(());
    }
    let count = specs.len();
    for (index, spec) in specs.into_iter().enumerate() {
        match handles.get(index) {
            Some(&handle) => scene.update_light(handle, spec)?,
            None => handles.push(scene.create_light(spec)),
        }
    }
    for handle in handles.drain(count..) {
        scene.delete_light(handle)?;
    }
    Ok(())
}

/// Delete every light in `handles`, reporting the first failure after trying all
pub fn delete_lights(scene: &mut dyn Scene, handles: &mut Vec<LightHandle>) -> PaintResult<()> {
    let mut result = Ok(());
    for handle in handles.drain(..) {
        if let Err(err) = scene.delete_light(handle) {
            result = result.and(Err(err));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::lighting::PointLight;
    use crate::scene::{MemoryScene, SceneSink};

    fn point(x: f32) -> LightSpec {
        LightSpec::Point(PointLight {
            location: Vec3::new(x, 0.0, 0.0),
            radius: 0.1,
            energy: 1.0,
            color: Vec3::new(1.0, 1.0, 1.0),
            visibility: RayVisibility::all(),
        })
    }

    #[test]
    fn test_sync_lights_grows_and_shrinks() {
        let mut scene = MemoryScene::new();
        let mut handles = Vec::new();

        sync_lights(&mut scene, &mut handles, vec![point(0.0), point(1.0), point(2.0)]).unwrap();
        assert_eq!(handles.len(), 3);
        assert_eq!(scene.light_count(), 3);

        let first = handles[0];
        sync_lights(&mut scene, &mut handles, vec![point(5.0)]).unwrap();
        assert_eq!(handles, vec![first]);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.light_spec(first), Some(&point(5.0)));

        sync_lights(&mut scene, &mut handles, Vec::new()).unwrap();
        assert_eq!(scene.light_count(), 1);

        delete_lights(&mut scene, &mut handles).unwrap();
        assert!(handles.is_empty());
        assert_eq!(scene.light_count(), 0);
    }

    #[test]
    fn test_common_commands() {
        let mut axis = AxisMode::Normal;
        let mut visibility = RayVisibility::all();

        assert_eq!(handle_common_command(PaintCommand::AxisZ, &mut axis, &mut visibility), ToolControl::Rerun);
        assert_eq!(axis, AxisMode::Z);
        assert_eq!(handle_common_command(PaintCommand::AxisZ, &mut axis, &mut visibility), ToolControl::Rerun);
        assert_eq!(axis, AxisMode::Normal);

        handle_common_command(PaintCommand::VisibilityToggleCamera, &mut axis, &mut visibility);
        assert!(!visibility.contains(RayVisibility::CAMERA));

        assert_eq!(handle_common_command(PaintCommand::Paint, &mut axis, &mut visibility), ToolControl::Ignored);
    }

    #[test]
    fn test_require_camera() {
        let scene = MemoryScene::new();
        assert_eq!(require_camera(AxisMode::Reflect, &scene), Err(PaintError::MissingCamera));
        assert!(require_camera(AxisMode::Normal, &scene).is_ok());
        assert!(require_camera(AxisMode::Reflect, &scene.with_camera(Vec3::z())).is_ok());
    }
}
