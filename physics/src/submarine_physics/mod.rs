mod types;
mod forces;
mod terms;
mod dynamics;

pub use types::{SubSnapshot, SubState, SubStepDebug};
pub use forces::{
    acceleration, buoyancy_force, current_velocity, hull_weight, proportion_submerged,
    resultant_force, total_mass, water_resistance_force, weight,
};
pub use terms::{
    angular_acceleration, angular_velocity, centre_of_mass, centre_of_mass_point,
    moment_of_inertia, torque,
};
pub use dynamics::{step_submarine, step_submarine_dbg};
