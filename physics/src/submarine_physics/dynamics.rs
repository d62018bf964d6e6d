use super::forces::{
    buoyancy_force, proportion_submerged, resultant_force, total_mass, water_resistance_force,
    weight,
};
use super::terms::{angular_velocity, centre_of_mass, keel_point, moment_of_inertia, torque};
use super::types::{SubState, SubStepDebug};
use crate::math::pitch_to_quat;
use crate::{SubPhysicsSpec, Vec3f};

/// Advance the body by `dt` with the current tank contents.
/// See `step_submarine_dbg` for the integration order.
pub fn step_submarine(spec: &SubPhysicsSpec, state: &mut SubState, dt: f32) {
    step_submarine_dbg(spec, state, dt, None);
}

/// Variant of `step_submarine` that fills out an optional debug telemetry struct.
///
/// Semi-implicit Euler: velocity from this step's force first, then position
/// from the new velocity. Pitch is integrated the same way from rest and
/// applied about the centre of mass, so the hull centre orbits that point.
/// The committed velocity becomes next step's `previous_velocity`.
pub fn step_submarine_dbg(
    spec: &SubPhysicsSpec,
    state: &mut SubState,
    dt: f32,
    mut dbg: Option<&mut SubStepDebug>,
) {
    if dt <= 0.0 || !dt.is_finite() {
        return;
    }

    // Translation
    let m_total = total_mass(spec, state);
    let force = resultant_force(spec, state);
    let accel = if m_total > 0.0 { force / m_total } else { Vec3f::ZERO };
    let velocity = state.previous_velocity + accel * dt;
    let submerged = proportion_submerged(spec, state);
    let buoyancy = buoyancy_force(spec, state);
    let w = weight(spec, state);
    let drag = water_resistance_force(spec, state);
    state.position += velocity * dt;

    // Rotation about the centre of mass
    let com = centre_of_mass(spec, state);
    let tau = torque(spec, state);
    let inertia = moment_of_inertia(spec, state);
    let omega = angular_velocity(spec, state, dt);
    let com_body = keel_point(spec, com);
    let pivot = state.position + pitch_to_quat(state.orientation_angle) * com_body;
    state.orientation_angle += omega * dt;
    state.position = pivot - pitch_to_quat(state.orientation_angle) * com_body;

    state.previous_velocity = velocity;

    if let Some(d) = dbg.as_mut() {
        d.dt = dt;
        d.proportion_submerged = submerged;
        d.mass_total = m_total;
        d.buoyancy = buoyancy;
        d.weight = w;
        d.drag = drag;
        d.resultant = force;
        d.acceleration = accel;
        d.velocity = velocity;
        d.centre_of_mass = com;
        d.torque = tau;
        d.moment_of_inertia = inertia;
        d.angular_velocity = omega;
        d.orientation_angle = state.orientation_angle;
        d.fill_fore = state.tanks[0].fill();
        d.fill_aft = state.tanks[1].fill();
    }
}
