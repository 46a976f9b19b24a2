//! Light painter demo
//!
//! Replays a literal stroke path through every paint command against an
//! in-memory scene, then drives one scripted interactive lamp session.
//!
//! Usage: `paint_demo [config.toml|config.ron]`

use light_painter::core::config::ConfigError;
use light_painter::foundation::logging;
use light_painter::prelude::*;
use thiserror::Error;

/// Stroke path painted on the floor under a small roof
const FLOOR_PATH: &str = "[[((-1.0, -1.0, 0.0), (0.0, 0.0, 1.0)), ((1.0, -1.0, 0.0), (0.0, 0.0, 1.0)), \
     ((1.0, 1.0, 0.0), (0.0, 0.0, 1.0)), ((-1.0, 1.0, 0.0), (0.0, 0.0, 1.0))]]";

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Paint error: {0}")]
    Paint(#[from] PaintError),
}

fn load_config() -> Result<PainterConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(PainterConfig::load(path)?),
        None => Ok(PainterConfig::default()),
    }
}

fn build_scene() -> MemoryScene {
    let mut scene = MemoryScene::new()
        .with_camera(Vec3::new(0.0, -8.0, 6.0))
        .with_cursor(Vec3::new(0.0, 0.0, 4.0));
    // Roof tilted over the patch, open toward +X
    scene.add_quad(Vec3::new(-2.0, 0.0, 3.0), Vec3::new(1.5, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
    scene
}

fn log_outcome(name: &str, outcome: &CommandOutcome, scene: &MemoryScene) {
    log::info!(
        "{name}: {} light(s), {} mesh(es), {} report(s)",
        outcome.lights.len(),
        outcome.meshes.len(),
        outcome.reports.len()
    );
    for &handle in &outcome.lights {
        if let Some(spec) = scene.light_spec(handle) {
            log::debug!("  {:?} at {:?}", spec.kind(), spec.location());
        }
    }
}

fn replay(config: &PainterConfig, scene: &mut MemoryScene) -> Result<(), DemoError> {
    let strokes = StrokeCollection::from_path_str(FLOOR_PATH)?;

    let lamp = LampCommand::new(config.lamp.clone()).execute(&strokes, scene)?;
    log_outcome("Lamp", &lamp, scene);

    let sun = SunCommand::new(config.sun.clone()).execute(&strokes, scene)?;
    log_outcome("Sun", &sun, scene);

    let sky = SkyCommand::new(config.sun.clone(), config.sky.clone()).execute(&strokes, scene)?;
    log_outcome("Sky", &sky, scene);

    let mesh = MeshCommand::new(config.mesh.clone()).execute(&strokes, scene)?;
    log_outcome("Mesh", &mesh, scene);

    let tube = TubeLightCommand::new(config.tube.clone()).execute(&strokes, scene)?;
    log_outcome("Tube", &tube, scene);

    let targets = lamp.lights.iter().chain(&sun.lights).copied().collect();
    let flag = FlagCommand::new(config.flag.clone(), targets).execute(&strokes, scene)?;
    log_outcome("Flag", &flag, scene);

    if let Some(&target) = lamp.lights.first() {
        let wall = StrokeCollection::from_path_str("[[((0.0, 2.0, 1.0), (0.0, -1.0, 0.0))]]")?;
        let adjusted = LampAdjustCommand::new(target, config.lamp.clone(), config.sun.clone()).execute(&wall, scene)?;
        log_outcome("Lamp adjust", &adjusted, scene);
    }
    Ok(())
}

fn interactive(config: &PainterConfig, scene: &mut MemoryScene) -> Result<(), DemoError> {
    let mut session = Session::new(LampCommand::new(config.lamp.clone()), config.session.clone());
    session.start(scene)?;

    let hit = |x: f32| StrokePoint::new(Vec3::new(x, 0.0, 0.0), Vec3::z());
    let script = [
        InputEvent::press(Key::LeftMouse).with_hit(hit(-1.0)),
        InputEvent::mouse_move(0.0).with_hit(hit(0.0)),
        InputEvent::mouse_move(0.0).with_hit(hit(1.0)),
        InputEvent::release(Key::LeftMouse),
        InputEvent::press(Key::T),
        InputEvent::press(Key::G).with_mouse_x(100.0),
        InputEvent::mouse_move(120.0),
        InputEvent::press(Key::LeftMouse).with_mouse_x(120.0),
        InputEvent::press(Key::Return),
    ];

    for event in &script {
        let state = session.handle_event(event, scene)?;
        log::debug!("{:?} {:?} -> {state:?}", event.key, event.value);
    }

    let outcome = session.outcome();
    log_outcome("Session", &outcome, scene);
    log::info!(
        "Session ended {:?} with a {:?} lamp at offset {:.2}",
        session.state(),
        session.tool().settings.lamp_type,
        session.tool().settings.offset
    );
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.logging.level);
    log::info!("Starting light painter demo");

    let mut scene = build_scene();
    replay(&config, &mut scene)?;
    interactive(&config, &mut scene)?;

    log::info!("Scene holds {} light(s) and {} mesh(es)", scene.light_count(), scene.mesh_count());
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
