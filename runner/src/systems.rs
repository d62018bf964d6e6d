use std::collections::VecDeque;

use bevy::app::AppExit;
use bevy::time::Time;
use bevy_ecs::prelude::*;
use physics::{Simulation, SubSnapshot};
use tracing::info;

use crate::config::ScriptEntry;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptSet;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimSet;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportSet;

#[derive(Resource, Debug, Clone)]
pub struct SimRes(pub Simulation);

/// Scripted commands not yet due, ordered by time.
#[derive(Resource, Debug, Clone, Default)]
pub struct Script(VecDeque<ScriptEntry>);

impl Script {
    /// Entries are ordered by `at_secs`; ties keep their given order.
    pub fn new(entries: impl IntoIterator<Item = ScriptEntry>) -> Self {
        let mut entries: Vec<ScriptEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Self(entries.into())
    }

    pub fn pending(&self) -> usize {
        self.0.len()
    }
}

/// While set, frames are dropped instead of accumulated.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimPause(pub bool);

#[derive(Resource, Debug, Clone, Copy)]
pub struct TelemetryLog {
    pub interval: f64,
    pub next_at: f64,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct RunLimit(pub Option<f32>);

/// Snapshot published after each frame's steps.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LatestSnapshot(pub Option<SubSnapshot>);

pub fn dispatch_script(mut script: ResMut<Script>, mut sim: ResMut<SimRes>) {
    let now = sim.0.clock().elapsed();
    while script.0.front().is_some_and(|e| f64::from(e.at_secs) <= now) {
        let Some(entry) = script.0.pop_front() else {
            break;
        };
        info!(at = entry.at_secs, command = ?entry.command, "script");
        sim.0.submit(entry.command);
    }
}

pub fn advance_simulation(
    time: Res<Time>,
    paused: Res<SimPause>,
    mut sim: ResMut<SimRes>,
    mut latest: ResMut<LatestSnapshot>,
) {
    if paused.0 {
        sim.0.clock_mut().reset(); // no catch-up on resume
        return;
    }
    let frame_dt = time.delta_secs();
    if frame_dt <= 0.0 {
        return;
    }
    if sim.0.advance(frame_dt) > 0 {
        latest.0 = Some(sim.0.snapshot());
    }
}

pub fn log_telemetry(sim: Res<SimRes>, mut log: ResMut<TelemetryLog>) {
    let now = sim.0.clock().elapsed();
    if now < log.next_at {
        return;
    }
    while log.next_at <= now {
        log.next_at += log.interval;
    }
    let snap = sim.0.snapshot();
    let dbg = sim.0.telemetry();
    info!(
        t = snap.time,
        depth = snap.depth,
        vy = snap.velocity.y,
        pitch = snap.orientation_angle,
        fore = snap.tank_fill[0],
        aft = snap.tank_fill[1],
        flow = ?dbg.flow.0,
        state = ?snap.control_state,
        auto = snap.auto_mode,
        "telemetry"
    );
}

pub fn stop_after_duration(sim: Res<SimRes>, limit: Res<RunLimit>, mut exit: EventWriter<AppExit>) {
    let Some(secs) = limit.0 else {
        return;
    };
    let elapsed = sim.0.clock().elapsed();
    if elapsed >= f64::from(secs) {
        info!(elapsed, ticks = sim.0.clock().ticks(), "run duration reached; exiting");
        exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use physics::{ControlState, SimCommand};

    use super::*;

    fn entry(at_secs: f32, state: ControlState) -> ScriptEntry {
        ScriptEntry { at_secs, command: SimCommand::SetControlState { state, override_lock: false } }
    }

    #[test]
    fn script_orders_entries_by_time() {
        let script = Script::new([
            entry(5.0, ControlState::Ascend),
            entry(0.0, ControlState::Descend),
            entry(5.0, ControlState::Level),
        ]);
        let order: Vec<f32> = script.0.iter().map(|e| e.at_secs).collect();
        assert_eq!(order, vec![0.0, 5.0, 5.0]);
        // Equal times keep their listed order.
        assert_eq!(script.0[1].command, entry(5.0, ControlState::Ascend).command);
        assert_eq!(script.pending(), 3);
    }
}
