//! Physical and loop constants shared by the core.

/// Gravitational acceleration (m/s²), acting along −Y.
pub const GRAVITY: f32 = 9.81;

/// Fresh water density (kg/m³).
pub const WATER_DENSITY: f32 = 997.0;

/// Upper bound on a single step. Longer frames (tab backgrounding, debugger
/// breaks) are clamped to this before integration.
pub const MAX_STEP_DT: f32 = 1.0 / 30.0;

/// Inertia below this is treated as zero and produces no angular acceleration.
pub const MIN_INERTIA: f32 = 1e-9;
