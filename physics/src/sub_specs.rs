use serde::{Deserialize, Serialize};

use crate::constants::WATER_DENSITY;
use crate::math::{clamp01, Vec3f};
use crate::SpecError;

/// Fixed physical parameters for one submersible hull and its autopilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPhysicsSpec {
    /// Hull mass without ballast tanks (kg).
    pub hull_mass: f32,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    /// Drag coefficient per world axis (x: broadside, y: top, z: bow).
    pub drag_coefficient: Vec3f,
    /// Cross-sectional area facing each world axis (m²).
    pub cross_section_area: Vec3f,
    /// Fore tank first, aft tank second.
    pub ballast_tanks: [BallastTankSpec; 2],
    /// Autopilot ascent speed target (m/s, positive up).
    pub ascent_speed: f32,
    /// Autopilot descent speed target (m/s, magnitude).
    pub descent_speed: f32,
    /// Ascent speed target while emergency surfacing (m/s).
    pub emergency_surface_speed: f32,
    /// Depth (y, ≤ 0) at which emergency surfacing hands over to depth hold.
    /// Slightly below zero so the hull decelerates before breaking the surface.
    pub surface_threshold: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallastTankSpec {
    /// Tank mass when dry (kg).
    pub empty_mass: f32,
    /// Water capacity (m³).
    pub max_volume: f32,
    /// Pump capacity (m³/s), both directions.
    pub flow_rate: f32,
    /// Longitudinal distance from the bow (m).
    pub offset_from_front: f32,
}

impl SubPhysicsSpec {
    /// Box-approximated displacement (m³).
    pub fn volume(&self) -> f32 {
        self.length * self.width * self.height
    }

    /// Hull centroid as a distance from the bow.
    pub fn hull_centre_offset(&self) -> f32 {
        0.5 * self.length
    }

    /// Common tank fill at which the fully submerged body is neutrally buoyant,
    /// clamped to what the tanks can actually hold.
    pub fn neutral_fill(&self) -> f32 {
        let displaced_mass = self.volume() * WATER_DENSITY;
        let dry_mass = self.hull_mass + self.ballast_tanks.iter().map(|t| t.empty_mass).sum::<f32>();
        let capacity_mass: f32 = self.ballast_tanks.iter().map(|t| t.max_volume * WATER_DENSITY).sum();
        if capacity_mass <= 0.0 {
            return 0.0;
        }
        clamp01((displaced_mass - dry_mass) / capacity_mass)
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        positive("hull_mass", self.hull_mass)?;
        positive("length", self.length)?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        for (field, v) in [
            ("drag_coefficient.x", self.drag_coefficient.x),
            ("drag_coefficient.y", self.drag_coefficient.y),
            ("drag_coefficient.z", self.drag_coefficient.z),
            ("cross_section_area.x", self.cross_section_area.x),
            ("cross_section_area.y", self.cross_section_area.y),
            ("cross_section_area.z", self.cross_section_area.z),
        ] {
            non_negative(field, v)?;
        }
        positive("ascent_speed", self.ascent_speed)?;
        positive("descent_speed", self.descent_speed)?;
        positive("emergency_surface_speed", self.emergency_surface_speed)?;
        if !self.surface_threshold.is_finite() || self.surface_threshold > 0.0 {
            return Err(SpecError::AboveWaterline {
                field: "surface_threshold",
                value: self.surface_threshold,
            });
        }

        for (i, tank) in self.ballast_tanks.iter().enumerate() {
            non_negative("ballast_tanks.empty_mass", tank.empty_mass)?;
            positive("ballast_tanks.max_volume", tank.max_volume)?;
            positive("ballast_tanks.flow_rate", tank.flow_rate)?;
            if !(0.0..=self.length).contains(&tank.offset_from_front) {
                return Err(SpecError::TankOutsideHull {
                    tank: i,
                    offset: tank.offset_from_front,
                    length: self.length,
                });
            }
        }
        let [fore, aft] = &self.ballast_tanks;
        if (fore.offset_from_front - aft.offset_from_front).abs() <= f32::EPSILON {
            return Err(SpecError::CoincidentTanks(fore.offset_from_front));
        }
        Ok(())
    }
}

impl Default for SubPhysicsSpec {
    fn default() -> Self {
        subspecs::model_sub_spec()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SpecError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpecError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SpecError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpecError::Negative { field, value })
    }
}

pub mod subspecs {
    use super::*;

    /// Bench-top model submersible: a 0.5 × 0.1 × 0.2 m box hull (0.01 m³)
    /// of 5.5 kg with two 3 L tanks, trimmed neutral at roughly 73 % fill.
    pub fn model_sub_spec() -> SubPhysicsSpec {
        let length = 0.5;
        let width = 0.1;
        let height = 0.2;
        let tank = |offset_from_front| BallastTankSpec {
            empty_mass: 0.05,
            max_volume: 0.003,
            // 10 % of capacity per second
            flow_rate: 0.0003,
            offset_from_front,
        };

        SubPhysicsSpec {
            hull_mass: 5.5,
            length,
            width,
            height,
            // Blunt box: broadside and top faces are flat plates, bow is faired.
            drag_coefficient: Vec3f::new(1.0, 1.0, 0.3),
            cross_section_area: Vec3f::new(length * height, length * width, width * height),
            ballast_tanks: [tank(0.1), tank(0.4)],
            ascent_speed: 0.01,
            descent_speed: 0.01,
            emergency_surface_speed: 0.2,
            surface_threshold: -0.1,
        }
    }
}
