//! Simulation time
//!
//! Obstacles read one elapsed-time value per tick. The value must be finite and
//! must never go backwards, otherwise every pose computed from it is wrong.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::error::ClockError;

/// Fixed-timestep clock driven by tick count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    pub ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Seconds since the clock started
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * SIM_DT
    }
}

/// Rejects elapsed-time readings that are missing or decreasing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonotonicGuard {
    last: Option<f32>,
}

impl MonotonicGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `elapsed` if it is finite and not below the previous reading
    pub fn check(&mut self, elapsed: f32) -> Result<f32, ClockError> {
        if !elapsed.is_finite() {
            return Err(ClockError::Missing);
        }
        match self.last {
            Some(previous) if elapsed < previous => {
                return Err(ClockError::NonMonotonic {
                    previous,
                    current: elapsed,
                });
            }
            _ => {}
        }
        self.last = Some(elapsed);
        Ok(elapsed)
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock() {
        let mut clock = SimClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        for _ in 0..60 {
            clock.advance();
        }
        assert!((clock.elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_guard_accepts_repeats_and_increases() {
        let mut guard = MonotonicGuard::new();
        assert_eq!(guard.check(0.0), Ok(0.0));
        assert_eq!(guard.check(0.0), Ok(0.0));
        assert_eq!(guard.check(0.5), Ok(0.5));
        assert_eq!(guard.last(), Some(0.5));
    }

    #[test]
    fn test_guard_rejects_bad_time() {
        let mut guard = MonotonicGuard::new();
        guard.check(2.0).unwrap();
        assert_eq!(
            guard.check(1.0),
            Err(ClockError::NonMonotonic {
                previous: 2.0,
                current: 1.0
            })
        );
        assert_eq!(guard.check(f32::NAN), Err(ClockError::Missing));
        assert_eq!(guard.check(f32::INFINITY), Err(ClockError::Missing));
        // Rejected readings do not move the guard
        assert_eq!(guard.last(), Some(2.0));
    }
}
