use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "subsim-runner")]
#[command(about = "Headless driver for the submersible simulation", long_about = None)]
pub struct Args {
    /// Path to the TOML config
    #[arg(long, default_value = "runner.toml")]
    pub config: PathBuf,
    /// Stop after this many simulated seconds (overrides the config)
    #[arg(long)]
    pub run_secs: Option<f32>,
    /// Frame loop rate in Hz (overrides the config)
    #[arg(long)]
    pub tick_hz: Option<u32>,
}
