//! Emissive convex hull tool

use crate::commands::{handle_common_command, require_camera, CommandOutcome, PaintTool, ToolControl};
use crate::core::config::MeshSettings;
use crate::error::PaintResult;
use crate::lighting::mesh::mesh_light;
use crate::lighting::{derive_with_fallback, hash_points, hull_points, GeometryCache, LightSpec};
use crate::report::Report;
use crate::scene::{LightHandle, MeshHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeCountMode, StrokeSource};

/// Hulls the painted cloud into an emissive mesh
#[derive(Debug, Clone)]
pub struct MeshCommand {
    /// Tool settings
    pub settings: MeshSettings,
    mesh: Option<MeshHandle>,
    light: Option<LightHandle>,
    cache: GeometryCache<MeshHandle>,
}

impl MeshCommand {
    /// Create the tool
    pub fn new(settings: MeshSettings) -> Self {
        Self { settings, mesh: None, light: None, cache: GeometryCache::new() }
    }
}

impl PaintTool for MeshCommand {
    fn name(&self) -> &'static str {
        "Paint Mesh Light"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        require_camera(self.settings.axis, scene.as_query())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        let mesh = scene.create_point_cloud_mesh(&[]);
        self.light = Some(scene.create_light(LightSpec::Mesh(mesh_light(mesh, &self.settings))));
        self.mesh = Some(mesh);
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        let (Some(mesh), Some(light)) = (self.mesh, self.light) else {
            return Ok(Vec::new());
        };
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }

        let settings = &self.settings;
        let resolved = get_strokes_with_normals(strokes, settings.axis, settings.offset, scene.as_query())?;
        let derived = derive_with_fallback(StrokeCountMode::One, &resolved, |stroke| {
            hull_points(stroke, settings.flatten)
        })?
        .require_items()?;
        if derived.items.is_empty() {
            return Ok(derived.reports);
        }

        let cloud = derived.items.concat();
        if self.cache.update(mesh, hash_points(&cloud)) {
            log::debug!("Rebuilding mesh light hull from {} points", cloud.len());
            scene.update_point_cloud_mesh(mesh, &cloud)?;
            scene.compute_convex_hull(mesh)?;
        }
        scene.update_light(light, LightSpec::Mesh(mesh_light(mesh, settings)))?;
        Ok(derived.reports)
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.cache.clear();
        let light = self.light.take().map_or(Ok(()), |light| scene.delete_light(light));
        let mesh = self.mesh.take().map_or(Ok(()), |mesh| scene.delete_mesh(mesh));
        light.and(mesh)
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome {
            lights: self.light.into_iter().collect(),
            meshes: self.mesh.into_iter().collect(),
            ..CommandOutcome::default()
        }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::FlattenToggle => {
                self.settings.flatten = !self.settings.flatten;
                ToolControl::Rerun
            }
            PaintCommand::OffsetMode => ToolControl::Drag(DragAttr::Offset),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::EmitValue),
            other => handle_common_command(other, &mut self.settings.axis, &mut self.settings.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::Offset => Some(self.settings.offset),
            DragAttr::EmitValue => Some(self.settings.emit_value),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::Offset => self.settings.offset = value,
            DragAttr::EmitValue => self.settings.emit_value = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{MemoryScene, SceneSink};
    use crate::stroke::{Stroke, StrokeCollection, StrokePoint};
    use approx::assert_relative_eq;

    fn square_strokes(height: f32) -> StrokeCollection {
        let points = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .iter()
            .map(|&(x, y)| StrokePoint::new(Vec3::new(x, y, height), Vec3::z()))
            .collect();
        StrokeCollection::from_strokes(vec![Stroke::from_points(points)])
    }

    #[test]
    fn test_execute_hulls_painted_square() {
        let mut scene = MemoryScene::new();
        let mut tool = MeshCommand::new(MeshSettings::default());

        let outcome = tool.execute(&square_strokes(0.0), &mut scene).unwrap();
        assert_eq!(outcome.lights.len(), 1);
        assert_eq!(outcome.meshes.len(), 1);

        let hull = scene.mesh(outcome.meshes[0]).unwrap();
        assert_eq!(hull.vertices.len(), 4);
        assert_eq!(hull.faces.len(), 2);

        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Mesh(light)) => {
                assert_eq!(light.mesh, outcome.meshes[0]);
                assert_relative_eq!(light.emit_value, 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_cloud_skips_rebuild() {
        let mut scene = MemoryScene::new();
        let mut tool = MeshCommand::new(MeshSettings { flatten: false, ..MeshSettings::default() });
        tool.startup(&mut scene).unwrap();
        let strokes = square_strokes(0.0);
        tool.update(&strokes, &mut scene).unwrap();

        let mesh = tool.outcome().meshes[0];
        assert!(!tool.cache.is_dirty(&mesh, hash_points(&strokes.positions())));

        tool.update(&square_strokes(2.0), &mut scene).unwrap();
        let hull = scene.mesh(mesh).unwrap();
        assert!(hull.vertices.iter().all(|v| (v.z - 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_flatten_toggle_and_emit_drag() {
        let mut tool = MeshCommand::new(MeshSettings::default());
        assert_eq!(tool.handle_command(PaintCommand::SizeMode), ToolControl::Ignored);
        assert_eq!(tool.handle_command(PaintCommand::FlattenToggle), ToolControl::Rerun);
        assert!(!tool.settings.flatten);
        assert_eq!(tool.handle_command(PaintCommand::PowerMode), ToolControl::Drag(DragAttr::EmitValue));
        tool.set_drag_value(DragAttr::EmitValue, 4.5);
        assert_eq!(tool.drag_value(DragAttr::EmitValue), Some(4.5));
    }

    #[test]
    fn test_rollback_removes_mesh_and_light() {
        let mut scene = MemoryScene::new();
        let mut tool = MeshCommand::new(MeshSettings::default());
        tool.execute(&square_strokes(0.0), &mut scene).unwrap();
        tool.rollback(&mut scene).unwrap();
        assert_eq!(scene.light_count(), 0);
        assert_eq!(scene.mesh_count(), 0);
        assert_eq!(tool.outcome(), CommandOutcome::default());
    }
}
