//! Shadow flag tool
//!
//! Hangs one card per selected lamp between the lamp and the painted patch so
//! the patch falls into the card's shadow.

use crate::commands::{apply_visibility_command, CommandOutcome, PaintTool, ToolControl};
use crate::core::config::FlagSettings;
use crate::error::{PaintError, PaintResult};
use crate::lighting::{flag_points, hash_points, FlagCard, GeometryCache, LightSpec};
use crate::report::Report;
use crate::scene::{LightHandle, MeshHandle, Scene};
use crate::session::{DragAttr, PaintCommand};
use crate::stroke::StrokeSource;

const NO_LAMPS_SELECTED: &str = "Select lamp objects to be flagged for shadows!";

/// One card and the lamp it shadows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Card {
    target: LightHandle,
    mesh: MeshHandle,
    light: LightHandle,
}

/// Places shadow cards for a lamp selection
#[derive(Debug, Clone)]
pub struct FlagCommand {
    /// Tool settings
    pub settings: FlagSettings,
    selected: Vec<LightHandle>,
    cards: Vec<Card>,
    cache: GeometryCache<MeshHandle>,
}

impl FlagCommand {
    /// Flag every lamp in `selected`
    pub fn new(settings: FlagSettings, selected: Vec<LightHandle>) -> Self {
        Self { settings, selected, cards: Vec::new(), cache: GeometryCache::new() }
    }

    fn card_spec(&self, mesh: MeshHandle, target: LightHandle) -> LightSpec {
        LightSpec::Flag(FlagCard {
            mesh,
            light: target,
            color: self.settings.color,
            opacity: self.settings.opacity,
            visibility: self.settings.visibility,
        })
    }
}

impl PaintTool for FlagCommand {
    fn name(&self) -> &'static str {
        "Paint Flag"
    }

    fn preflight(&self, scene: &dyn Scene) -> PaintResult<()> {
        let all_lamps = self
            .selected
            .iter()
            .all(|&handle| scene.light_spec(handle).is_some_and(LightSpec::is_lamp));
        if self.selected.is_empty() || !all_lamps {
            return Err(PaintError::InvalidSelection(NO_LAMPS_SELECTED.to_string()));
        }
        Ok(())
    }

    fn startup(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        for &target in &self.selected {
            let mesh = scene.create_point_cloud_mesh(&[]);
            let light = scene.create_light(self.card_spec(mesh, target));
            self.cards.push(Card { target, mesh, light });
        }
        Ok(())
    }

    fn update(&mut self, strokes: &dyn StrokeSource, scene: &mut dyn Scene) -> PaintResult<Vec<Report>> {
        if !strokes.has_strokes() {
            return Ok(Vec::new());
        }
        let painted = strokes.strokes().positions();

        for card in &self.cards {
            let lamp = scene
                .light_spec(card.target)
                .cloned()
                .ok_or_else(|| PaintError::MissingObject(format!("{:?}", card.target)))?;
            let points = flag_points(&painted, &lamp, &self.settings)?;

            if self.cache.update(card.mesh, hash_points(&points)) {
                scene.update_point_cloud_mesh(card.mesh, &points)?;
                scene.compute_convex_hull(card.mesh)?;
            }
            scene.update_light(card.light, self.card_spec(card.mesh, card.target))?;
        }
        Ok(Vec::new())
    }

    fn rollback(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.cache.clear();
        let mut result = Ok(());
        for card in self.cards.drain(..) {
            result = result.and(scene.delete_light(card.light)).and(scene.delete_mesh(card.mesh));
        }
        result
    }

    fn outcome(&self) -> CommandOutcome {
        CommandOutcome {
            lights: self.cards.iter().map(|card| card.light).collect(),
            meshes: self.cards.iter().map(|card| card.mesh).collect(),
            ..CommandOutcome::default()
        }
    }

    fn handle_command(&mut self, command: PaintCommand) -> ToolControl {
        match command {
            PaintCommand::SizeMode => ToolControl::Drag(DragAttr::Factor),
            PaintCommand::OffsetMode => ToolControl::Drag(DragAttr::Offset),
            PaintCommand::PowerMode => ToolControl::Drag(DragAttr::Opacity),
            other if apply_visibility_command(other, &mut self.settings.visibility) => ToolControl::Rerun,
            _ => ToolControl::Ignored,
        }
    }

    fn drag_value(&self, attr: DragAttr) -> Option<f32> {
        match attr {
            DragAttr::Factor => Some(self.settings.factor),
            DragAttr::Offset => Some(self.settings.sun_offset),
            DragAttr::Opacity => Some(self.settings.opacity),
            _ => None,
        }
    }

    fn set_drag_value(&mut self, attr: DragAttr, value: f32) {
        match attr {
            DragAttr::Factor => self.settings.factor = value,
            DragAttr::Offset => self.settings.sun_offset = value,
            DragAttr::Opacity => self.settings.opacity = value,
            _ => {}
        }
    }
}
