//! Bevy app that drives a `physics::Simulation` from a frame loop and a
//! time-stamped command script.

use std::time::Duration;

use anyhow::{Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

pub mod args;
pub mod config;
pub mod systems;

pub use args::Args;
pub use config::{load_config, Config, InitialConditions, ScriptEntry};
pub use systems::{
    LatestSnapshot, ReportSet, RunLimit, Script, ScriptSet, SimPause, SimRes, SimSet, TelemetryLog,
};

/// App ticking against the wall clock at `cfg.tick_hz`.
pub fn build_runner_app(cfg: Config) -> Result<App> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(cfg.tick_hz.max(1)));
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
    install(&mut app, cfg)?;
    Ok(app)
}

/// App without plugins; the caller advances `Time` by hand before each update.
pub fn build_headless_app(cfg: Config) -> Result<App> {
    let mut app = App::new();
    app.init_resource::<Time>();
    install(&mut app, cfg)?;
    Ok(app)
}

fn install(app: &mut App, cfg: Config) -> Result<()> {
    let sim = cfg.build_simulation().context("building simulation")?;
    app.insert_resource(SimRes(sim))
        .insert_resource(Script::new(cfg.script.iter().copied()))
        .insert_resource(TelemetryLog {
            interval: f64::from(cfg.log_interval_secs),
            next_at: 0.0,
        })
        .insert_resource(RunLimit(cfg.run_secs))
        .init_resource::<SimPause>()
        .init_resource::<LatestSnapshot>()
        .configure_sets(Update, (ScriptSet, SimSet, ReportSet).chain())
        .add_systems(Update, systems::dispatch_script.in_set(ScriptSet))
        .add_systems(Update, systems::advance_simulation.in_set(SimSet))
        .add_systems(
            Update,
            (systems::log_telemetry, systems::stop_after_duration).in_set(ReportSet),
        );
    Ok(())
}
