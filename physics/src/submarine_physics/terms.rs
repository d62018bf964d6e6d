//! Pitch model: a 1-D point-mass body (hull centroid plus two tanks along the
//! keel), not a full inertia tensor. Offsets are distances from the bow.

use std::f32::consts::FRAC_PI_2;

use super::forces::{buoyancy_force, hull_weight, total_mass};
use crate::constants::MIN_INERTIA;
use crate::math::pitch_to_quat;
use crate::{SubPhysicsSpec, SubState, Vec3f};

/// Centre of mass as a distance from the bow.
pub fn centre_of_mass(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    let mut moment = spec.hull_mass * spec.hull_centre_offset();
    for tank in &state.tanks {
        moment += tank.mass() * tank.spec.offset_from_front;
    }
    let m = total_mass(spec, state);
    if m > 0.0 {
        moment / m
    } else {
        spec.hull_centre_offset()
    }
}

/// Centre of mass in world space. The bow sits at body +Z·length/2.
pub fn centre_of_mass_point(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    state.position + pitch_to_quat(state.orientation_angle) * keel_point(spec, centre_of_mass(spec, state))
}

/// Body-space point on the keel line `offset` metres aft of the bow.
pub(super) fn keel_point(spec: &SubPhysicsSpec, offset: f32) -> Vec3f {
    Vec3f::new(0.0, 0.0, spec.hull_centre_offset() - offset)
}

/// Pitch torque about the centre of mass (N·m). Positive raises the nose.
///
/// Net hull lift (buoyancy − hull weight) acts at the hull centroid and each
/// tank's weight at its own offset; every lever arm is projected onto the
/// horizontal by `sin(θ + π/2)`.
pub fn torque(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    let com = centre_of_mass(spec, state);
    let projection = (state.orientation_angle + FRAC_PI_2).sin();
    let hull_lift = buoyancy_force(spec, state).y + hull_weight(spec).y;

    // Lever arms measured aft-positive from the centre of mass: an upward
    // force ahead of it (negative arm) lifts the nose, as does weight aft.
    let mut tau = -(spec.hull_centre_offset() - com) * hull_lift;
    for tank in &state.tanks {
        tau += (tank.spec.offset_from_front - com) * -tank.weight().y;
    }
    tau * projection
}

/// Σ m·|r| about the centre of mass for hull and both tanks.
pub fn moment_of_inertia(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    let com = centre_of_mass(spec, state);
    let mut inertia = spec.hull_mass * (spec.hull_centre_offset() - com).abs();
    for tank in &state.tanks {
        inertia += tank.mass() * (tank.spec.offset_from_front - com).abs();
    }
    inertia
}

pub fn angular_acceleration(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    let inertia = moment_of_inertia(spec, state);
    if inertia <= MIN_INERTIA {
        return 0.0;
    }
    torque(spec, state) / inertia
}

/// Pitch rate for this step. No spin is carried between ticks, so the rate
/// starts from rest every step.
pub fn angular_velocity(spec: &SubPhysicsSpec, state: &SubState, dt: f32) -> f32 {
    angular_acceleration(spec, state) * dt
}
