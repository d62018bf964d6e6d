use crate::autopilot::{ControlState, FlowCommand};
use crate::math::pitch_to_quat;
use crate::{BallastTank, Quatf, SubPhysicsSpec, TankId, Vec3f};

/// Mutable kinematic state of the body. Everything else (forces, current
/// velocity, torque) is derived from this plus the `SubPhysicsSpec` on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SubState {
    /// Hull centre in world space. The waterline is y = 0, +Y up.
    pub position: Vec3f,
    /// Pitch about the body's lateral axis (rad). Positive = nose up.
    pub orientation_angle: f32,
    /// Velocity committed by the previous step. The only value carried from
    /// one tick to the next.
    pub previous_velocity: Vec3f,
    /// Fore tank first, aft tank second.
    pub tanks: [BallastTank; 2],
}

impl SubState {
    /// Level, motionless body with both tanks at `fill`.
    pub fn at_rest(spec: &SubPhysicsSpec, position: Vec3f, fill: f32) -> Self {
        Self {
            position,
            orientation_angle: 0.0,
            previous_velocity: Vec3f::ZERO,
            tanks: spec.ballast_tanks.map(|t| BallastTank::new(t, fill)),
        }
    }

    /// Vertical position of the hull centre; negative below the waterline.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.y
    }

    /// Body→world rotation for the renderer.
    pub fn orientation(&self) -> Quatf {
        pitch_to_quat(self.orientation_angle)
    }

    pub fn tank(&self, id: TankId) -> &BallastTank {
        &self.tanks[id.index()]
    }

    pub fn tank_mut(&mut self, id: TankId) -> &mut BallastTank {
        &mut self.tanks[id.index()]
    }

    pub fn tank_fill(&self) -> [f32; 2] {
        [self.tanks[0].fill(), self.tanks[1].fill()]
    }
}

/// Breakdown of the most recent step, for HUDs and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubStepDebug {
    pub dt: f32,
    pub time: f32,
    pub flow: FlowCommand,
    // Translation
    pub proportion_submerged: f32,
    pub mass_total: f32,
    pub buoyancy: Vec3f,
    pub weight: Vec3f,
    pub drag: Vec3f,
    pub resultant: Vec3f,
    pub acceleration: Vec3f,
    pub velocity: Vec3f,
    // Rotation
    pub centre_of_mass: f32,
    pub torque: f32,
    pub moment_of_inertia: f32,
    pub angular_velocity: f32,
    pub orientation_angle: f32,
    // Ballast
    pub fill_fore: f32,
    pub fill_aft: f32,
}

/// Read-only view handed to the renderer/UI after each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSnapshot {
    pub time: f32,
    pub position: Vec3f,
    pub depth: f32,
    pub orientation_angle: f32,
    pub velocity: Vec3f,
    pub resultant_force: Vec3f,
    pub tank_fill: [f32; 2],
    pub control_state: Option<ControlState>,
    pub auto_mode: bool,
    pub target_depth: Option<f32>,
}
