use serde::{Deserialize, Serialize};

use crate::constants::{GRAVITY, WATER_DENSITY};
use crate::math::{clamp01, Vec3f};
use crate::BallastTankSpec;

/// Which of the two trim tanks a command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankId {
    Fore,
    Aft,
}

impl TankId {
    pub const fn index(self) -> usize {
        match self {
            TankId::Fore => 0,
            TankId::Aft => 1,
        }
    }
}

/// A variable-mass water reservoir. The fill proportion is the only mutable
/// field and is kept in [0, 1] by every mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallastTank {
    pub spec: BallastTankSpec,
    fill: f32,
}

impl BallastTank {
    pub fn new(spec: BallastTankSpec, fill: f32) -> Self {
        Self { spec, fill: clamp01(fill) }
    }

    pub fn empty(spec: BallastTankSpec) -> Self {
        Self::new(spec, 0.0)
    }

    #[inline]
    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn water_volume(&self) -> f32 {
        self.spec.max_volume * self.fill
    }

    pub fn mass(&self) -> f32 {
        self.spec.empty_mass + self.water_volume() * WATER_DENSITY
    }

    /// Weight vector (N), pointing down.
    pub fn weight(&self) -> Vec3f {
        Vec3f::new(0.0, -self.mass() * GRAVITY, 0.0)
    }

    /// Volume the pump can move in `dt` seconds.
    pub fn flow_volume(&self, dt: f32) -> f32 {
        self.spec.flow_rate * dt.max(0.0)
    }

    /// Add water; anything beyond capacity is discarded.
    pub fn add_water(&mut self, volume: f32) {
        self.shift_volume(volume.max(0.0));
    }

    /// Remove water; the tank bottoms out at empty.
    pub fn remove_water(&mut self, volume: f32) {
        self.shift_volume(-volume.max(0.0));
    }

    /// Explicit reset, e.g. when a driver restarts a scenario.
    pub fn reset(&mut self, fill: f32) {
        self.fill = clamp01(fill);
    }

    fn shift_volume(&mut self, delta: f32) {
        if self.spec.max_volume <= 0.0 || !delta.is_finite() {
            return;
        }
        self.fill = clamp01((self.water_volume() + delta) / self.spec.max_volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn spec() -> BallastTankSpec {
        BallastTankSpec {
            empty_mass: 0.05,
            max_volume: 0.003,
            flow_rate: 0.0003,
            offset_from_front: 0.1,
        }
    }

    #[test]
    fn overflow_is_discarded() {
        let mut tank = BallastTank::new(spec(), 0.9);
        tank.add_water(0.01);
        assert_eq!(tank.fill(), 1.0);
        assert!((tank.mass() - (0.05 + 0.003 * WATER_DENSITY)).abs() < 1e-4);
    }

    #[test]
    fn cannot_go_negative() {
        let mut tank = BallastTank::new(spec(), 0.1);
        tank.remove_water(1.0);
        assert_eq!(tank.fill(), 0.0);
        assert!((tank.mass() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn negative_volumes_are_ignored() {
        let mut tank = BallastTank::new(spec(), 0.5);
        tank.add_water(-0.001);
        tank.remove_water(-0.001);
        assert_eq!(tank.fill(), 0.5);
    }

    #[test]
    fn one_second_of_flow_moves_ten_percent() {
        let mut tank = BallastTank::empty(spec());
        for _ in 0..60 {
            let v = tank.flow_volume(1.0 / 60.0);
            tank.add_water(v);
        }
        assert!((tank.fill() - 0.1).abs() < 1e-4, "fill={}", tank.fill());
    }

    #[test]
    fn weight_points_down() {
        let tank = BallastTank::new(spec(), 1.0);
        let w = tank.weight();
        assert!(w.y < 0.0 && w.x == 0.0 && w.z == 0.0);
        assert!((w.y + tank.mass() * GRAVITY).abs() < 1e-4);
    }

    #[test]
    fn random_flow_sequences_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut tank = BallastTank::empty(spec());
        for _ in 0..10_000 {
            let volume = rng.gen_range(0.0..0.004_f32);
            if rng.gen_bool(0.5) {
                tank.add_water(volume);
            } else {
                tank.remove_water(volume);
            }
            assert!((0.0..=1.0).contains(&tank.fill()), "fill escaped: {}", tank.fill());
            assert!(tank.mass() >= tank.spec.empty_mass);
        }
    }
}
