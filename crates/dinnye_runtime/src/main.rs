//! Dinnye
//!
//! Loads a simulation module and runs its frame loop in a window.

use anyhow::{Context, Result};
use dinnye_core::SeedSource;
use dinnye_host::{LoadOptions, WasmEngine};
use dinnye_render::window::{create_event_loop, WindowConfig};
use dinnye_runtime::{App, FrameScheduler};
use dinnye_services::settings::SETTINGS_FILE;
use dinnye_services::{InputController, Settings};
use std::path::Path;
use winit::event_loop::ControlFlow;

fn main() -> Result<()> {
    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE))?
        .with_args(std::env::args().skip(1));

    let (level, bad_level) = match settings.log_level.parse::<tracing::Level>() {
        Ok(level) => (level, None),
        Err(err) => (tracing::Level::INFO, Some(err)),
    };
    tracing_subscriber::fmt().with_max_level(level).init();
    if let Some(err) = bad_level {
        tracing::warn!(log_level = %settings.log_level, %err, "unknown log level, using info");
    }

    tracing::info!("Dinnye v{}", dinnye_core::VERSION);

    let engine = WasmEngine::from_file(
        &settings.module_path,
        LoadOptions {
            stride_words: settings.record_stride_words,
        },
    )
    .with_context(|| {
        format!(
            "failed to start simulation module {}",
            settings.module_path.display()
        )
    })?;

    let mut seeds = SeedSource::from_entropy();
    if let Some(replay) = &settings.replay_seeds {
        tracing::info!(seeds = replay.len(), "replaying captured seeds");
        seeds = seeds.with_replay(replay.iter().copied());
    }
    if settings.capture_seeds {
        seeds = seeds.capturing();
    }

    let input = InputController::new(1.0, settings.size_classes);
    let scheduler = FrameScheduler::new(engine, input, seeds, settings.output_size)?;

    let config = WindowConfig {
        title: settings.window.title.clone(),
        width: settings.window.width,
        height: settings.window.height,
    };

    let event_loop = create_event_loop()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scheduler);
    event_loop.run_app(&mut app)?;

    if let Some(captured) = app.scheduler().seeds().captured() {
        tracing::info!(frames = app.scheduler().frames(), ?captured, "captured seeds");
    }

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
