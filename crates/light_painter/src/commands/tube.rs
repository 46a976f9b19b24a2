//! Skinned tube light tool

use crate::commands::{handle_common_command, require_camera, CommandOutcome, PaintTool, ToolControl};
use crate::core::config::TubeSettings;
use crate::error::PaintResult;
use crate::lighting::{hash_polylines, merge_by_distance, tube_geometry, GeometryCache, LightSpec, TubeGeometry, TubeLight};
use crate::report::Report;
use crate::scene::{LightHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::{get_strokes_with_normals, StrokeSource};

/// Turns every stroke into a glowing tube
#[derive(Debug, Clone)]
pub struct TubeLightCommand {
    /// Tool settings
    pub settings: TubeSettings,
    light: Option<LightHandle>,
    merged: TubeGeometry,
    cache: GeometryCache<LightHandle>,
}

impl TubeLightCommand {
    /// Create the tool
    pub fn new(settings: TubeSettings) -> Self {
        Self { settings, light: None, merged: TubeGeometry::default(), cache: GeometryCache::new() }
    }

    fn light_spec(&self) -> LightSpec {
        let settings = &self.settings;
        LightSpec::Tube(TubeLight {
            vertices: self.merged.vertices.clone(),
            edges: self.merged.edges.clone(),
            skin_radius: settings.skin_radius,
            pre_subdiv: settings.pre_subdiv,
            post_subdiv: settings.post_subdiv,
            smooth: settings.smooth,
            emit_value: settings.emit_value,
            color: settings.color,
            visibility: settings.visibility,
        })
    }
}

impl PaintTool for TubeLightCommand {
    fn name(&self) -> &'static str {
        "Paint Tube Light"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        require_camera(self.settings.axis, scene.as_query())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.merged = TubeGeometry::default();
        self.light = Some(scene.create_light(self.light_spec()));
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        let Some(light) = self.light else {
            return Ok(Vec::new());
        };
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }

        let resolved = get_strokes_with_normals(strokes, self.settings.axis, self.settings.offset, scene.as_query())?;
        let raw = tube_geometry(&resolved);
        if self.cache.update(light, hash_polylines(&raw.vertices, &raw.edges)) {
            self.merged = merge_by_distance(&raw, self.settings.merge_distance);
            log::debug!(
                "Tube merged {} vertices into {}",
                raw.vertices.len(),
                self.merged.vertices.len()
            );
        }

        scene.update_light(light, self.light_spec())?;
        Ok(Vec::new())
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.cache.clear();
        self.merged = TubeGeometry::default();
        self.light.take().map_or(Ok(()), |light| scene.delete_light(light))
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome { lights: self.light.into_iter().collect(), ..CommandOutcome::default() }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::OffsetMode => ToolControl::Drag(DragAttr::Offset),
            PaintCommand::SizeMode => ToolControl::Drag(DragAttr::SkinRadius),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::EmitValue),
            other => handle_common_command(other, &mut self.settings.axis, &mut self.settings.visibility),
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::Offset => Some(self.settings.offset),
            DragAttr::SkinRadius => Some(self.settings.skin_radius),
            DragAttr::EmitValue => Some(self.settings.emit_value),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::Offset => self.settings.offset = value,
            DragAttr::SkinRadius => self.settings.skin_radius = value,
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

    fn line(points: &[(f32, f32)]) -> Stroke {
        Stroke::from_points(
            points
                .iter()
                .map(|&(x, y)| StrokePoint::new(Vec3::new(x, y, 0.0), Vec3::z()))
                .collect(),
        )
    }

    #[test]
    fn test_strokes_meeting_at_a_point_share_a_vertex() {
        let strokes = StrokeCollection::from_strokes(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.01, 0.0), (1.0, 1.0)]),
        ]);
        let mut scene = MemoryScene::new();
        let mut tool = TubeLightCommand::new(TubeSettings::default());

        let outcome = tool.execute(&strokes, &mut scene).unwrap();
        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Tube(tube)) => {
                assert_eq!(tube.vertices.len(), 3);
                assert_eq!(tube.edges, vec![[0, 1], [1, 2]]);
                assert_relative_eq!(tube.skin_radius, 0.1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_offset_lifts_tube_off_surface() {
        let strokes = StrokeCollection::from_strokes(vec![line(&[(0.0, 0.0), (2.0, 0.0)])]);
        let mut scene = MemoryScene::new();
        let settings = TubeSettings { offset: 0.5, ..TubeSettings::default() };

        let outcome = TubeLightCommand::new(settings).execute(&strokes, &mut scene).unwrap();
        match scene.light_spec(outcome.lights[0]) {
            Some(LightSpec::Tube(tube)) => {
                assert!(tube.vertices.iter().all(|v| (v.z - 0.5).abs() < 1e-5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_skin_radius_drag_rebuilds_spec() {
        let strokes = StrokeCollection::from_strokes(vec![line(&[(0.0, 0.0), (2.0, 0.0)])]);
        let mut scene = MemoryScene::new();
        let mut tool = TubeLightCommand::new(TubeSettings::default());
        let light = tool.execute(&strokes, &mut scene).unwrap().lights[0];

        assert_eq!(tool.handle_command(PaintCommand::SizeMode), ToolControl::Drag(DragAttr::SkinRadius));
        tool.set_drag_value(DragAttr::SkinRadius, 0.25);
        tool.update(&strokes, &mut scene).unwrap();

        match scene.light_spec(light) {
            Some(LightSpec::Tube(tube)) => {
                assert_relative_eq!(tube.skin_radius, 0.25);
                assert_eq!(tube.vertices.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rollback_deletes_tube() {
        let strokes = StrokeCollection::from_strokes(vec![line(&[(0.0, 0.0), (2.0, 0.0)])]);
        let mut scene = MemoryScene::new();
        let mut tool = TubeLightCommand::new(TubeSettings::default());
        tool.execute(&strokes, &mut scene).unwrap();
        tool.rollback(&mut scene).unwrap();
        assert_eq!(scene.light_count(), 0);
    }
}
