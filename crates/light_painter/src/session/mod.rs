//! # Interactive Session
//!
//! Feeds host input events to a paint tool. Painting and erasing edit the
//! stroke list and rerun the tool; drag modes adjust a tool attribute from
//! pointer motion; finish commits and cancel rolls back.
//!
//! Every pass runs to completion before the next event is handled.

pub mod keymap;
pub mod drag;

pub use drag::{snap, DragAttr, DragState};
pub use keymap::{
    is_event_command, match_command, matching_commands, InputEvent, Key, KeyValue, PaintCommand, Trigger, KEYMAP,
};

use crate::commands::{CommandOutcome, PaintTool, ToolControl};
use crate::core::config::SessionSettings;
use crate::error::PaintResult;
use crate::report::Report;
use crate::scene::Scene;
use crate::stroke::{StrokeCollection, StrokePoint, StrokeSource};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for input
    Idle,
    /// Left button held, samples are appended
    Painting,
    /// Erase button held, samples are removed
    Erasing,
    /// Committed; the tool's objects stay in the scene
    Confirmed,
    /// Rolled back
    Cancelled,
}

impl SessionState {
    /// True once the session has been confirmed or cancelled
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

/// Drives one tool from host input events
#[derive(Debug)]
pub struct Session<T: PaintTool> {
    tool: T,
    strokes: StrokeCollection,
    state: SessionState,
    drag: Option<DragState>,
    eraser_radius: f32,
    settings: SessionSettings,
    reports: Vec<Report>,
    /// Some pass has placed the tool's objects from painted strokes
    placed: bool,
}

impl<T: PaintTool> Session<T> {
    /// Create a session around `tool`
    pub fn new(tool: T, settings: SessionSettings) -> Self {
        Self {
            tool,
            strokes: StrokeCollection::new(),
            state: SessionState::Idle,
            drag: None,
            eraser_radius: settings.eraser_radius,
            settings,
            reports: Vec::new(),
            placed: false,
        }
    }

    /// Validate the setup and create the tool's placeholders.
    ///
    /// Setup errors abort here, before the scene is touched.
    pub fn start(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        self.tool.preflight(&*scene)?;
        self.tool.startup(scene)?;
        self.state = SessionState::Idle;
        log::info!("{} session started", self.tool.name());
        Ok(())
    }

    /// Handle one input event and return the resulting state
    pub fn handle_event(&mut self, event: &InputEvent, scene: &mut dyn Scene) -> PaintResult<SessionState> {
        if self.state.is_finished() {
            return Ok(self.state);
        }
        if self.drag.is_some() {
            self.handle_drag(event, scene);
            return Ok(self.state);
        }

        let commands: Vec<PaintCommand> = matching_commands(event).collect();
        if commands.is_empty() {
            self.handle_motion(event, scene);
            return Ok(self.state);
        }

        for command in commands {
            if self.handle_session_command(command, event, scene)? {
                return Ok(self.state);
            }
            if event.value == KeyValue::Release {
                continue;
            }
            match self.tool.handle_command(command) {
                ToolControl::Ignored => {}
                ToolControl::Rerun => {
                    log::debug!("{command:?} changed {} settings", self.tool.name());
                    self.run_pass(scene);
                    break;
                }
                ToolControl::Drag(attr) => {
                    if let Some(value) = self.tool.drag_value(attr) {
                        log::debug!("Dragging {} from {value}", attr.label());
                        self.drag = Some(DragState::new(attr, value, event.mouse_x));
                    }
                    break;
                }
            }
        }
        Ok(self.state)
    }

    /// Session-level commands; returns whether `command` was one
    fn handle_session_command(
        &mut self,
        command: PaintCommand,
        event: &InputEvent,
        scene: &mut dyn Scene,
    ) -> PaintResult<bool> {
        let pressed = event.value != KeyValue::Release;
        match command {
            PaintCommand::Paint => {
                if pressed {
                    self.state = SessionState::Painting;
                    self.paint(event.hit.as_ref(), scene);
                } else {
                    self.state = SessionState::Idle;
                }
            }
            PaintCommand::Erase => {
                if pressed {
                    self.state = SessionState::Erasing;
                    self.erase(event.hit.as_ref(), scene);
                } else {
                    self.state = SessionState::Idle;
                }
            }
            PaintCommand::EraserDecrease if pressed => {
                self.eraser_radius = (self.eraser_radius - self.settings.eraser_step).max(self.settings.eraser_min);
            }
            PaintCommand::EraserIncrease if pressed => {
                self.eraser_radius += self.settings.eraser_step;
            }
            PaintCommand::EndStroke => self.strokes.begin_stroke(),
            PaintCommand::Cancel => {
                self.state = SessionState::Cancelled;
                log::info!("{} cancelled", self.tool.name());
                self.tool.rollback(scene)?;
            }
            PaintCommand::Finish => self.finish(scene)?,
            PaintCommand::EraserDecrease | PaintCommand::EraserIncrease => {}
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn handle_motion(&mut self, event: &InputEvent, scene: &mut dyn Scene) {
        match self.state {
            SessionState::Painting => self.paint(event.hit.as_ref(), scene),
            SessionState::Erasing => self.erase(event.hit.as_ref(), scene),
            _ => {}
        }
    }

    fn handle_drag(&mut self, event: &InputEvent, scene: &mut dyn Scene) {
        let Some(mut drag) = self.drag else {
            return;
        };

        if event.key == Key::MouseMove {
            let current = self.tool.drag_value(drag.attr).unwrap_or(drag.initial);
            let value = drag.advance(current, event.mouse_x, event.shift, event.ctrl);
            self.tool.set_drag_value(drag.attr, value);
            self.drag = Some(drag);
            self.run_pass(scene);
        } else if is_event_command(event, PaintCommand::Cancel) {
            self.tool.set_drag_value(drag.attr, drag.initial);
            self.drag = None;
            self.run_pass(scene);
        } else if event.value == KeyValue::Press && match_command(event).is_some() {
            log::debug!("{} set to {:?}", drag.attr.label(), self.tool.drag_value(drag.attr));
            self.drag = None;
        }
    }

    fn paint(&mut self, hit: Option<&StrokePoint>, scene: &mut dyn Scene) {
        if let Some(hit) = hit {
            self.strokes.push(*hit);
            self.run_pass(scene);
        }
    }

    fn erase(&mut self, hit: Option<&StrokePoint>, scene: &mut dyn Scene) {
        let Some(hit) = hit else {
            return;
        };
        let radius = self.settings.eraser_world_radius(self.eraser_radius);
        if self.strokes.erase(&hit.position, radius) > 0 {
            self.run_pass(scene);
        }
    }

    fn finish(&mut self, scene: &mut dyn Scene) -> PaintResult<()> {
        if !self.strokes.has_strokes() {
            self.reports.push(Report::info("Nothing painted"));
            self.state = SessionState::Cancelled;
            return self.tool.rollback(scene);
        }
        self.run_pass(scene);
        if !self.placed {
            // Only placeholders exist; leave the scene as it was found
            self.state = SessionState::Cancelled;
            log::warn!("{} produced no lights, rolling back", self.tool.name());
            return self.tool.rollback(scene);
        }
        self.state = SessionState::Confirmed;
        log::info!("{} confirmed with {} stroke(s)", self.tool.name(), self.strokes.len());
        Ok(())
    }

    /// One inference pass; failures become reports
    fn run_pass(&mut self, scene: &mut dyn Scene) {
        match self.tool.update(&self.strokes, scene) {
            Ok(reports) => {
                self.placed |= self.strokes.has_strokes();
                self.reports.extend(reports);
            }
            Err(err) => self.reports.push(Report::from(&err)),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Strokes painted so far
    pub fn strokes(&self) -> &StrokeCollection {
        &self.strokes
    }

    /// The tool being driven
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Mutable access to the tool
    pub fn tool_mut(&mut self) -> &mut T {
        &mut self.tool
    }

    /// Attribute being dragged, if any
    pub fn dragging(&self) -> Option<DragAttr> {
        self.drag.map(|drag| drag.attr)
    }

    /// Current eraser radius in screen units
    pub fn eraser_radius(&self) -> f32 {
        self.eraser_radius
    }

    /// Reports collected so far
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Objects the tool owns plus every collected report
    pub fn outcome(&self) -> CommandOutcome {
        let mut outcome = self.tool.outcome();
        outcome.reports = self.reports.clone();
        outcome
    }
}

impl<T: PaintTool> StrokeSource for Session<T> {
    fn strokes(&self) -> &StrokeCollection {
        &self.strokes
    }
}
