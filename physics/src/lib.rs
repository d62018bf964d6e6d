//! Physics core for a buoyancy-driven submersible.
//!
//! This crate intentionally avoids any ECS, rendering or I/O types. It exposes
//! plain serializable specs and state plus pure force functions, so a driver
//! (the `runner` app, a renderer, a test) can step it and read it back.

mod math;
pub use math::{Quatf, Vec3f};

pub mod constants;

mod error;
pub use error::SpecError;

mod sub_specs;
pub use sub_specs::subspecs;
pub use sub_specs::{BallastTankSpec, SubPhysicsSpec};

mod ballast;
pub use ballast::{BallastTank, TankId};

pub mod submarine_physics;
pub use submarine_physics::{
    step_submarine, step_submarine_dbg, SubSnapshot, SubState, SubStepDebug,
};

pub mod autopilot;
pub use autopilot::{apply_flow, Autopilot, ControlState, FlowCommand};

mod clock;
pub use clock::{SimulationClock, Steps};

mod commands;
pub use commands::SimCommand;

mod simulation;
pub use simulation::Simulation;
