//! # Light Painter
//!
//! Paint strokes onto scene surfaces and infer the lights that would produce
//! that illumination.
//!
//! ## Features
//!
//! - **Lamps**: point, spot and area lamps placed behind the painted patch
//! - **Sun and Sky**: occlusion-aware sun directions and sky model parameters
//! - **Emitters**: convex hull mesh lights and skinned tube lights
//! - **Flags**: shadow cards hung between existing lamps and the patch
//! - **Sessions**: keymap-driven painting, erasing and attribute dragging
//!
//! The host supplies surface samples and implements [`scene::SceneQuery`] and
//! [`scene::SceneSink`]; [`scene::MemoryScene`] is a complete in-memory host.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use light_painter::prelude::*;
//!
//! fn main() -> Result<(), PaintError> {
//!     let strokes = StrokeCollection::from_path_str(
//!         "[[((-1.0, -1.0, 0.0), (0.0, 0.0, 1.0)), ((1.0, 1.0, 0.0), (0.0, 0.0, 1.0))]]",
//!     )?;
//!     let mut scene = MemoryScene::new();
//!     let mut tool = LampCommand::new(LampSettings::default());
//!     let outcome = tool.execute(&strokes, &mut scene)?;
//!     println!("created {} light(s)", outcome.lights.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared foundations
pub mod foundation;
pub mod config;
pub mod core;
pub mod error;
pub mod report;

// Inference
pub mod geometry;
pub mod stroke;
pub mod lighting;
pub mod scene;

// Tools
pub mod commands;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{PaintError, PaintResult};
pub use report::{Report, ReportLevel};

/// Common imports for light painter users
pub mod prelude {
    pub use crate::{
        commands::{
            CommandOutcome, FlagCommand, LampAdjustCommand, LampCommand, MeshCommand, PaintTool, SkyCommand,
            SunCommand, ToolControl, TubeLightCommand,
        },
        config::Config,
        core::config::{
            FlagSettings, LampSettings, MeshSettings, PainterConfig, SessionSettings, SkySettings, SunSettings,
            TubeSettings,
        },
        foundation::math::{Quat, Vec3},
        lighting::{AreaShape, LampType, LightKind, LightSpec, RayVisibility, SkyModelKind},
        scene::{LightHandle, MemoryScene, MeshHandle, Scene, SceneQuery, SceneSink},
        session::{InputEvent, Key, KeyValue, PaintCommand, Session, SessionState},
        stroke::{AxisMode, Stroke, StrokeCollection, StrokeCountMode, StrokePoint, StrokeSource},
        PaintError, PaintResult, Report, ReportLevel,
    };
}
