use std::path::Path;

use anyhow::{bail, Context, Result};
use physics::{SimCommand, Simulation, SimulationClock, SpecError, SubPhysicsSpec, SubState, Vec3f};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Args;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame loop rate when running against the wall clock.
    pub tick_hz: u32,
    /// Longest step the simulation will take in one go (s).
    pub max_dt: f32,
    /// Fixed physics step (s). Unset means one step per frame.
    pub step_dt: Option<f32>,
    /// Simulated seconds between telemetry lines.
    pub log_interval_secs: f32,
    /// Stop after this many simulated seconds. Unset runs until killed.
    pub run_secs: Option<f32>,
    /// Start in automatic (true) or manual ballast control.
    pub auto_mode: bool,
    pub initial: InitialConditions,
    pub spec: SubPhysicsSpec,
    /// Commands replayed against simulated time.
    pub script: Vec<ScriptEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            max_dt: physics::constants::MAX_STEP_DT,
            step_dt: None,
            log_interval_secs: 1.0,
            run_secs: None,
            auto_mode: true,
            initial: InitialConditions::default(),
            spec: SubPhysicsSpec::default(),
            script: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub position: Vec3f,
    pub orientation_angle: f32,
    /// Common tank fill. Unset trims the body neutral.
    pub fill: Option<f32>,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            position: Vec3f::new(0.0, -1.0, 0.0),
            orientation_angle: 0.0,
            fill: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub at_secs: f32,
    pub command: SimCommand,
}

impl Config {
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(secs) = args.run_secs {
            self.run_secs = Some(secs);
        }
        if let Some(hz) = args.tick_hz {
            self.tick_hz = hz;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            bail!("tick_hz must be at least 1");
        }
        if !self.log_interval_secs.is_finite() || self.log_interval_secs <= 0.0 {
            bail!("log_interval_secs must be positive (got {})", self.log_interval_secs);
        }
        if let Some(secs) = self.run_secs {
            if secs.is_nan() || secs < 0.0 {
                bail!("run_secs must be non-negative (got {secs})");
            }
        }
        let bad_entry = self.script.iter().find(|e| e.at_secs.is_nan() || e.at_secs < 0.0);
        if let Some(entry) = bad_entry {
            bail!("script entry at {} s: time must be non-negative", entry.at_secs);
        }
        self.clock().validate().context("clock")?;
        self.spec.validate().context("spec")?;
        Ok(())
    }

    pub fn clock(&self) -> SimulationClock {
        match self.step_dt {
            Some(step) => SimulationClock::fixed(step, self.max_dt),
            None => SimulationClock::variable(self.max_dt),
        }
    }

    pub fn build_simulation(&self) -> Result<Simulation, SpecError> {
        let fill = self.initial.fill.unwrap_or_else(|| self.spec.neutral_fill());
        let mut sub = SubState::at_rest(&self.spec, self.initial.position, fill);
        sub.orientation_angle = self.initial.orientation_angle;
        let mut sim = Simulation::new(self.spec.clone(), sub, self.clock())?;
        sim.set_auto_mode(self.auto_mode);
        Ok(sim)
    }
}

/// Read and validate a config file. A missing file falls back to defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found; using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(cfg)
}
