use std::collections::VecDeque;

use tracing::debug;

use crate::submarine_physics::resultant_force;
use crate::{
    apply_flow, step_submarine_dbg, Autopilot, BallastTank, ControlState, SimCommand,
    SimulationClock, SpecError, SubPhysicsSpec, SubSnapshot, SubState, SubStepDebug, TankId,
};

/// One submersible with its autopilot and clock.
///
/// Drivers call `advance` once per frame and read `snapshot` back; discrete
/// inputs go through `submit` (queued, applied before the next tick) or the
/// direct setters.
#[derive(Debug, Clone)]
pub struct Simulation {
    spec: SubPhysicsSpec,
    sub: SubState,
    autopilot: Autopilot,
    clock: SimulationClock,
    pending: VecDeque<SimCommand>,
    telemetry: SubStepDebug,
}

impl Simulation {
    /// Validates `spec` and `clock`. The tanks in `initial` keep their fill
    /// but take their geometry and pump rates from `spec`.
    pub fn new(
        spec: SubPhysicsSpec,
        mut initial: SubState,
        clock: SimulationClock,
    ) -> Result<Self, SpecError> {
        spec.validate()?;
        clock.validate()?;
        for (tank, tank_spec) in initial.tanks.iter_mut().zip(spec.ballast_tanks) {
            *tank = BallastTank::new(tank_spec, tank.fill());
        }
        Ok(Self {
            spec,
            sub: initial,
            autopilot: Autopilot::default(),
            clock,
            pending: VecDeque::new(),
            telemetry: SubStepDebug::default(),
        })
    }

    /// Body at rest and level at `depth`, tanks at neutral trim.
    pub fn trimmed_at(
        spec: SubPhysicsSpec,
        depth: f32,
        clock: SimulationClock,
    ) -> Result<Self, SpecError> {
        let sub = SubState::at_rest(&spec, crate::Vec3f::new(0.0, depth, 0.0), spec.neutral_fill());
        Self::new(spec, sub, clock)
    }

    pub fn spec(&self) -> &SubPhysicsSpec {
        &self.spec
    }

    pub fn sub(&self) -> &SubState {
        &self.sub
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Breakdown of the most recent step.
    pub fn telemetry(&self) -> &SubStepDebug {
        &self.telemetry
    }

    /// Queue a command for the start of the next tick.
    pub fn submit(&mut self, cmd: SimCommand) {
        self.pending.push_back(cmd);
    }

    /// Apply a command immediately. Returns false if it was refused.
    pub fn apply_command(&mut self, cmd: SimCommand) -> bool {
        match cmd {
            SimCommand::SetControlState { state, override_lock } => {
                self.set_control_state(state, override_lock)
            }
            SimCommand::SetManualTarget { tank, proportion } => {
                self.set_manual_target(tank, proportion);
                true
            }
            SimCommand::SetAutoMode { enabled } => self.set_auto_mode(enabled),
            SimCommand::ToggleAutoMode => self.toggle_auto_mode(),
        }
    }

    pub fn set_control_state(&mut self, state: ControlState, override_lock: bool) -> bool {
        self.autopilot.set_state(state, override_lock, self.sub.depth())
    }

    pub fn set_manual_target(&mut self, tank: TankId, proportion: f32) {
        self.autopilot.set_manual_target(tank, proportion);
    }

    pub fn set_auto_mode(&mut self, enabled: bool) -> bool {
        self.autopilot.set_auto_mode(enabled)
    }

    pub fn toggle_auto_mode(&mut self) -> bool {
        let next = !self.autopilot.auto_mode();
        self.autopilot.set_auto_mode(next)
    }

    fn drain_pending(&mut self) {
        while let Some(cmd) = self.pending.pop_front() {
            if !self.apply_command(cmd) {
                debug!(?cmd, "command refused");
            }
        }
    }

    /// Feed one frame's wall-clock delta. Returns the number of steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.drain_pending();
        let mut taken = 0;
        for dt in self.clock.advance(frame_dt) {
            if self.step(dt) {
                taken += 1;
            }
        }
        taken
    }

    /// Run exactly one tick of `dt` (clamped). Returns false if `dt` was
    /// rejected.
    pub fn step(&mut self, dt: f32) -> bool {
        let Some(dt) = self.clock.clamp_dt(dt) else {
            return false;
        };
        self.drain_pending();

        let flow = self.autopilot.decide(&self.spec, &self.sub, dt);
        apply_flow(&self.spec, &mut self.sub, flow, dt);

        let mut dbg = SubStepDebug::default();
        step_submarine_dbg(&self.spec, &mut self.sub, dt, Some(&mut dbg));
        self.clock.commit(dt);

        dbg.flow = flow;
        dbg.time = self.clock.elapsed() as f32;
        self.telemetry = dbg;
        true
    }

    pub fn snapshot(&self) -> SubSnapshot {
        SubSnapshot {
            time: self.clock.elapsed() as f32,
            position: self.sub.position,
            depth: self.sub.depth(),
            orientation_angle: self.sub.orientation_angle,
            velocity: self.sub.previous_velocity,
            resultant_force: resultant_force(&self.spec, &self.sub),
            tank_fill: self.sub.tank_fill(),
            control_state: self.autopilot.state(),
            auto_mode: self.autopilot.auto_mode(),
            target_depth: self.autopilot.target_depth(),
        }
    }
}
