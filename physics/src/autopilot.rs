//! Ballast autopilot: a small state machine that turns the body's kinematic
//! state into a per-tank flow decision each tick.

use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::math::clamp01;
use crate::submarine_physics::{current_velocity, proportion_submerged};
use crate::{SubPhysicsSpec, SubState, TankId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    Ascend,
    Descend,
    LockDepth,
    Level,
    EmergencySurface,
}

/// Signed pump demand per tank, in multiples of that tank's flow rate.
/// Positive fills, negative drains. Index order matches `TankId`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowCommand(pub [f32; 2]);

impl FlowCommand {
    pub const HOLD: Self = Self([0.0, 0.0]);

    pub const fn fill_both() -> Self {
        Self([1.0, 1.0])
    }

    pub const fn empty_both() -> Self {
        Self([-1.0, -1.0])
    }

    /// Pump water from one tank into the other at full rate.
    pub fn transfer(from: TankId, to: TankId) -> Self {
        let mut rates = [0.0; 2];
        rates[from.index()] -= 1.0;
        rates[to.index()] += 1.0;
        Self(rates)
    }

    pub fn get(self, tank: TankId) -> f32 {
        self.0[tank.index()]
    }

    pub fn is_hold(self) -> bool {
        self.0.iter().all(|r| *r == 0.0)
    }
}

impl Add for FlowCommand {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}

/// Control mode plus the manual-trim inputs.
///
/// With `auto_mode` off the state machine is bypassed and each tank is driven
/// toward its manual target. Before the first command there is no control
/// state and the tanks hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Autopilot {
    state: Option<ControlState>,
    auto_mode: bool,
    manual_targets: [f32; 2],
    target_depth: Option<f32>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            state: None,
            auto_mode: true,
            manual_targets: [0.0, 0.0],
            target_depth: None,
        }
    }
}

impl Autopilot {
    pub fn state(&self) -> Option<ControlState> {
        self.state
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn manual_targets(&self) -> [f32; 2] {
        self.manual_targets
    }

    pub fn target_depth(&self) -> Option<f32> {
        self.target_depth
    }

    fn surfacing(&self) -> bool {
        self.state == Some(ControlState::EmergencySurface)
    }

    /// Switch control state. While emergency surfacing, only an override may
    /// change the state. Returns whether the request was applied.
    ///
    /// Entering `LockDepth` or `Level` latches the current depth (never above
    /// the waterline) as the hold target; entering `EmergencySurface` forces
    /// automatic control.
    pub fn set_state(&mut self, next: ControlState, override_lock: bool, depth: f32) -> bool {
        if self.surfacing() && !override_lock {
            debug!(requested = ?next, "emergency surface active; state change refused");
            return false;
        }
        if self.state != Some(next) {
            debug!(from = ?self.state, to = ?next, "autopilot state change");
        }
        self.state = Some(next);
        match next {
            ControlState::LockDepth | ControlState::Level => {
                self.target_depth = Some(depth.min(0.0));
            }
            ControlState::EmergencySurface => {
                self.auto_mode = true;
            }
            ControlState::Ascend | ControlState::Descend => {}
        }
        true
    }

    /// Switch between automatic and manual control. Manual control cannot
    /// pre-empt an emergency surface.
    pub fn set_auto_mode(&mut self, auto: bool) -> bool {
        if !auto && self.surfacing() {
            debug!("emergency surface active; manual mode refused");
            return false;
        }
        self.auto_mode = auto;
        true
    }

    pub fn set_manual_target(&mut self, tank: TankId, proportion: f32) {
        let p = if proportion.is_finite() { clamp01(proportion) } else { 0.0 };
        self.manual_targets[tank.index()] = p;
    }

    /// Decide this tick's pump demand from the body's current state.
    pub fn decide(&mut self, spec: &SubPhysicsSpec, sub: &SubState, dt: f32) -> FlowCommand {
        if !self.auto_mode {
            return self.manual(sub, dt);
        }
        let Some(state) = self.state else {
            return FlowCommand::HOLD;
        };
        match state {
            ControlState::Ascend => hold_vertical_speed(spec, sub, dt, spec.ascent_speed),
            ControlState::Descend => hold_vertical_speed(spec, sub, dt, -spec.descent_speed),
            ControlState::LockDepth => self.maintain_depth(spec, sub, dt),
            ControlState::Level => level(sub) + self.maintain_depth(spec, sub, dt),
            ControlState::EmergencySurface => {
                if sub.depth() < spec.surface_threshold {
                    hold_vertical_speed(spec, sub, dt, spec.emergency_surface_speed)
                } else {
                    info!(depth = sub.depth(), "surfaced; handing over to depth hold");
                    self.set_state(ControlState::LockDepth, true, sub.depth());
                    FlowCommand::HOLD
                }
            }
        }
    }

    fn maintain_depth(&self, spec: &SubPhysicsSpec, sub: &SubState, dt: f32) -> FlowCommand {
        let Some(target) = self.target_depth else {
            return FlowCommand::HOLD;
        };
        let depth = sub.depth();
        if depth > target {
            hold_vertical_speed(spec, sub, dt, -spec.descent_speed)
        } else if depth < target {
            hold_vertical_speed(spec, sub, dt, spec.ascent_speed)
        } else {
            FlowCommand::HOLD
        }
    }

    /// Drive each tank toward its manual target, shortening the last step so
    /// the tank settles on the target instead of chattering around it.
    fn manual(&self, sub: &SubState, dt: f32) -> FlowCommand {
        let mut rates = [0.0; 2];
        for (i, tank) in sub.tanks.iter().enumerate() {
            let step = tank.flow_volume(dt) / tank.spec.max_volume;
            if step.is_nan() || step <= 0.0 {
                continue;
            }
            let diff = self.manual_targets[i] - tank.fill();
            rates[i] = (diff / step).clamp(-1.0, 1.0);
        }
        FlowCommand(rates)
    }
}

/// Bang-bang speed hold: too fast upward → take on water, too slow → blow.
fn hold_vertical_speed(spec: &SubPhysicsSpec, sub: &SubState, dt: f32, target: f32) -> FlowCommand {
    let vy = current_velocity(spec, sub, dt).y;
    if vy > target {
        FlowCommand::fill_both()
    } else if vy < target {
        FlowCommand::empty_both()
    } else {
        FlowCommand::HOLD
    }
}

/// Nose down → move water aft; nose up → move water forward.
fn level(sub: &SubState) -> FlowCommand {
    let angle = sub.orientation_angle;
    if angle < 0.0 {
        FlowCommand::transfer(TankId::Fore, TankId::Aft)
    } else if angle > 0.0 {
        FlowCommand::transfer(TankId::Aft, TankId::Fore)
    } else {
        FlowCommand::HOLD
    }
}

/// Apply a flow decision to the tanks for `dt` seconds.
///
/// Intake needs the hull in the water: while fully emerged, fill demand is
/// ignored and only draining happens.
pub fn apply_flow(spec: &SubPhysicsSpec, sub: &mut SubState, cmd: FlowCommand, dt: f32) {
    if dt <= 0.0 || !dt.is_finite() {
        return;
    }
    let can_fill = proportion_submerged(spec, sub) > 0.0;
    for (tank, rate) in sub.tanks.iter_mut().zip(cmd.0) {
        let volume = tank.flow_volume(dt) * rate.abs();
        if rate > 0.0 && can_fill {
            tank.add_water(volume);
        } else if rate < 0.0 {
            tank.remove_water(volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subspecs::model_sub_spec;
    use crate::Vec3f;

    const DT: f32 = 1.0 / 60.0;

    fn sub_at(y: f32) -> (SubPhysicsSpec, SubState) {
        let spec = model_sub_spec();
        let fill = spec.neutral_fill();
        let sub = SubState::at_rest(&spec, Vec3f::new(0.0, y, 0.0), fill);
        (spec, sub)
    }

    #[test]
    fn no_command_holds_tanks() {
        let (spec, sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        assert!(ap.decide(&spec, &sub, DT).is_hold());
    }

    #[test]
    fn lock_depth_latches_and_does_not_drift() {
        let mut ap = Autopilot::default();
        assert!(ap.set_state(ControlState::LockDepth, false, -2.5));
        assert_eq!(ap.target_depth(), Some(-2.5));
        for _ in 0..10 {
            assert!(ap.set_state(ControlState::LockDepth, false, -2.5));
        }
        assert_eq!(ap.state(), Some(ControlState::LockDepth));
        assert_eq!(ap.target_depth(), Some(-2.5));
    }

    #[test]
    fn target_depth_never_above_waterline() {
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::Level, false, 0.4);
        assert_eq!(ap.target_depth(), Some(0.0));
    }

    #[test]
    fn emergency_surface_cannot_be_interrupted_without_override() {
        let mut ap = Autopilot::default();
        ap.set_auto_mode(false);
        assert!(ap.set_state(ControlState::EmergencySurface, false, -3.0));
        assert!(ap.auto_mode(), "emergency surfacing forces automatic control");

        assert!(!ap.set_state(ControlState::Descend, false, -3.0));
        assert_eq!(ap.state(), Some(ControlState::EmergencySurface));
        assert!(!ap.set_auto_mode(false));
        assert!(ap.auto_mode());

        assert!(ap.set_state(ControlState::Descend, true, -3.0));
        assert_eq!(ap.state(), Some(ControlState::Descend));
    }

    #[test]
    fn ascend_fills_when_rising_too_fast() {
        let (spec, mut sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::Ascend, false, sub.depth());
        sub.previous_velocity = Vec3f::new(0.0, 0.5, 0.0);
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::fill_both());
        sub.previous_velocity = Vec3f::new(0.0, -0.5, 0.0);
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::empty_both());
    }

    #[test]
    fn descend_targets_negative_speed() {
        let (spec, mut sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::Descend, false, sub.depth());
        sub.previous_velocity = Vec3f::ZERO;
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::fill_both());
        sub.previous_velocity = Vec3f::new(0.0, -0.5, 0.0);
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::empty_both());
    }

    #[test]
    fn lock_depth_descends_when_above_target() {
        let (spec, mut sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::LockDepth, false, -2.0);
        // Above target and not yet sinking: take on water.
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::fill_both());
        sub.position.y = -3.0;
        assert_eq!(ap.decide(&spec, &sub, DT), FlowCommand::empty_both());
    }

    #[test]
    fn level_shifts_water_against_the_pitch() {
        let (spec, mut sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::Level, false, sub.depth());
        sub.orientation_angle = -0.2;
        let cmd = ap.decide(&spec, &sub, DT);
        assert!(cmd.get(TankId::Aft) > cmd.get(TankId::Fore));
        sub.orientation_angle = 0.2;
        let cmd = ap.decide(&spec, &sub, DT);
        assert!(cmd.get(TankId::Fore) > cmd.get(TankId::Aft));
    }

    #[test]
    fn emergency_surface_hands_over_to_lock_depth() {
        let (spec, mut sub) = sub_at(-2.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::EmergencySurface, false, sub.depth());
        let cmd = ap.decide(&spec, &sub, DT);
        assert_eq!(cmd, FlowCommand::empty_both());
        assert_eq!(ap.state(), Some(ControlState::EmergencySurface));

        sub.position.y = spec.surface_threshold + 0.01;
        let cmd = ap.decide(&spec, &sub, DT);
        assert!(cmd.is_hold());
        assert_eq!(ap.state(), Some(ControlState::LockDepth));
        assert_eq!(ap.target_depth(), Some(sub.depth()));
    }

    #[test]
    fn manual_mode_settles_on_targets() {
        let (spec, mut sub) = sub_at(-1.0);
        let mut ap = Autopilot::default();
        ap.set_state(ControlState::Descend, false, sub.depth());
        ap.set_auto_mode(false);
        ap.set_manual_target(TankId::Fore, 0.9);
        ap.set_manual_target(TankId::Aft, 0.2);
        for _ in 0..(60 * 10) {
            let cmd = ap.decide(&spec, &sub, DT);
            apply_flow(&spec, &mut sub, cmd, DT);
        }
        let [fore, aft] = sub.tank_fill();
        assert!((fore - 0.9).abs() < 1e-4, "fore={fore}");
        assert!((aft - 0.2).abs() < 1e-4, "aft={aft}");
        assert!(ap.decide(&spec, &sub, DT).0.iter().all(|r| r.abs() < 1e-2));
    }

    #[test]
    fn manual_targets_are_clamped() {
        let mut ap = Autopilot::default();
        ap.set_manual_target(TankId::Fore, 1.7);
        ap.set_manual_target(TankId::Aft, -0.3);
        assert_eq!(ap.manual_targets(), [1.0, 0.0]);
    }

    #[test]
    fn filling_is_inhibited_out_of_the_water() {
        let (spec, mut sub) = sub_at(1.0);
        let before = sub.tank_fill();
        apply_flow(&spec, &mut sub, FlowCommand::fill_both(), DT);
        assert_eq!(sub.tank_fill(), before);
        apply_flow(&spec, &mut sub, FlowCommand::empty_both(), DT);
        assert!(sub.tank_fill()[0] < before[0]);
    }

    #[test]
    fn transfer_conserves_water_in_mid_range() {
        let (spec, mut sub) = sub_at(-1.0);
        let total_before: f32 = sub.tanks.iter().map(|t| t.water_volume()).sum();
        apply_flow(&spec, &mut sub, FlowCommand::transfer(TankId::Fore, TankId::Aft), DT);
        let total_after: f32 = sub.tanks.iter().map(|t| t.water_volume()).sum();
        assert!((total_before - total_after).abs() < 1e-9);
        assert!(sub.tank_fill()[1] > sub.tank_fill()[0]);
    }
}
