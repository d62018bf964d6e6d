//! Translational force model. Every function is a pure read of `(spec, state)`;
//! nothing here is cached between calls.

use crate::constants::{GRAVITY, WATER_DENSITY};
use crate::math::clamp01;
use crate::{SubPhysicsSpec, SubState, Vec3f};

const DOWN: Vec3f = Vec3f::new(0.0, -1.0, 0.0);

pub fn total_mass(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    spec.hull_mass + state.tanks.iter().map(|t| t.mass()).sum::<f32>()
}

/// Fraction of the hull height below the waterline.
///
/// `position` is the hull centre: fully submerged at y ≤ −h/2, fully emerged
/// at y ≥ h/2, linear in between.
pub fn proportion_submerged(spec: &SubPhysicsSpec, state: &SubState) -> f32 {
    if spec.height <= 0.0 {
        return 0.0;
    }
    clamp01(0.5 - state.position.y / spec.height)
}

/// Archimedes: weight of the displaced water, pointing up.
pub fn buoyancy_force(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    let displaced = spec.volume() * proportion_submerged(spec, state);
    -DOWN * (displaced * WATER_DENSITY * GRAVITY)
}

pub fn weight(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    DOWN * (total_mass(spec, state) * GRAVITY)
}

pub fn hull_weight(spec: &SubPhysicsSpec) -> Vec3f {
    DOWN * (spec.hull_mass * GRAVITY)
}

/// Quadratic drag opposing the previous step's velocity:
/// `−v̂ ⊙ A ⊙ Cd · ½ρ|v|² · submerged`. Zero when the body is at rest.
pub fn water_resistance_force(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    let v = state.previous_velocity;
    let speed2 = v.length_squared();
    if speed2 <= f32::EPSILON * f32::EPSILON || !speed2.is_finite() {
        return Vec3f::ZERO;
    }
    let direction = -v / speed2.sqrt();
    let q = 0.5 * WATER_DENSITY * speed2 * proportion_submerged(spec, state);
    direction * spec.cross_section_area * spec.drag_coefficient * q
}

pub fn resultant_force(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    buoyancy_force(spec, state) + weight(spec, state) + water_resistance_force(spec, state)
}

pub fn acceleration(spec: &SubPhysicsSpec, state: &SubState) -> Vec3f {
    let m = total_mass(spec, state);
    if m <= 0.0 {
        return Vec3f::ZERO;
    }
    resultant_force(spec, state) / m
}

/// Velocity this step will commit: `previous_velocity + a·dt`.
pub fn current_velocity(spec: &SubPhysicsSpec, state: &SubState, dt: f32) -> Vec3f {
    state.previous_velocity + acceleration(spec, state) * dt
}
