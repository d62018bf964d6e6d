use crate::constants::MAX_STEP_DT;
use crate::SpecError;

/// Turns wall-clock frame deltas into simulation steps.
///
/// In variable mode every frame is one step of the (clamped) frame delta. In
/// fixed mode frame time is accumulated and paid out in whole `step_dt`
/// slices; the frame delta is clamped first, so a long stall costs at most
/// `max_dt` worth of catch-up.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    max_dt: f32,
    step_dt: Option<f32>,
    acc: f32,
    elapsed: f64,
    ticks: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::variable(MAX_STEP_DT)
    }
}

impl SimulationClock {
    pub fn variable(max_dt: f32) -> Self {
        Self {
            max_dt,
            step_dt: None,
            acc: 0.0,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn fixed(step_dt: f32, max_dt: f32) -> Self {
        Self {
            step_dt: Some(step_dt),
            ..Self::variable(max_dt)
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(SpecError::NonPositive { field: "max_dt", value: self.max_dt });
        }
        if let Some(step) = self.step_dt {
            if !step.is_finite() || step <= 0.0 {
                return Err(SpecError::NonPositive { field: "step_dt", value: step });
            }
            if step > self.max_dt {
                return Err(SpecError::StepExceedsMax { step_dt: step, max_dt: self.max_dt });
            }
        }
        Ok(())
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    pub fn step_dt(&self) -> Option<f32> {
        self.step_dt
    }

    /// Clamp a raw delta to `max_dt`. Non-positive or non-finite deltas
    /// produce no step.
    pub fn clamp_dt(&self, raw: f32) -> Option<f32> {
        if raw > 0.0 && raw.is_finite() {
            Some(raw.min(self.max_dt))
        } else {
            None
        }
    }

    /// Schedule the steps owed for one frame. The steps are not counted as
    /// simulated until `commit` is called for each.
    pub fn advance(&mut self, frame_dt: f32) -> Steps {
        let Some(dt) = self.clamp_dt(frame_dt) else {
            return Steps::NONE;
        };
        let Some(step_dt) = self.step_dt else {
            return Steps { dt, remaining: 1 };
        };
        self.acc += dt;
        let mut remaining = 0;
        while self.acc >= step_dt {
            self.acc -= step_dt;
            remaining += 1;
        }
        Steps { dt: step_dt, remaining }
    }

    /// Record one executed step.
    pub fn commit(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);
        self.ticks += 1;
    }

    /// Drop any partially accumulated frame time (e.g. on resume from pause).
    pub fn reset(&mut self) {
        self.acc = 0.0;
    }

    /// Total simulated seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Step deltas owed for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    dt: f32,
    remaining: u32,
}

impl Steps {
    const NONE: Self = Self { dt: 0.0, remaining: 0 };
}

impl Iterator for Steps {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.dt)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Steps {}
