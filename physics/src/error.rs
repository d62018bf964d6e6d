use thiserror::Error;

/// Invalid physical configuration. Raised at construction, never per tick.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("{field} must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be non-negative and finite (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be at or below the waterline (got {value})")]
    AboveWaterline { field: &'static str, value: f32 },
    #[error("ballast tank {tank} offset {offset} m lies outside the hull (length {length} m)")]
    TankOutsideHull { tank: usize, offset: f32, length: f32 },
    #[error("fixed step {step_dt} s exceeds the {max_dt} s step clamp")]
    StepExceedsMax { step_dt: f32, max_dt: f32 },
    #[error("ballast tanks share offset {0} m from the front; pitch inertia would be degenerate")]
    CoincidentTanks(f32),
}
