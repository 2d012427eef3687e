//! Run lifecycle
//!
//! Ready -> Playing -> Ended, and back to Ready on restart. Timestamps are
//! wall-clock milliseconds supplied by the caller.

use serde::{Deserialize, Serialize};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    /// On the start block, timer not running
    #[default]
    Ready,
    /// Timer running
    Playing,
    /// Reached the finish, timer frozen
    Ended,
}

/// Inputs that move a run between phases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// First movement input
    Start { at_ms: f64 },
    /// Player reached the goal
    Finish { at_ms: f64 },
    /// Player asked for another go
    Restart,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `event`. Returns false, leaving the state untouched, when the
    /// event does not apply to the current phase.
    pub fn apply(&mut self, event: RunEvent) -> bool {
        let next = match (self.phase, event) {
            (RunPhase::Ready, RunEvent::Start { at_ms }) => {
                self.start_time = Some(at_ms);
                self.end_time = None;
                RunPhase::Playing
            }
            (RunPhase::Playing, RunEvent::Finish { at_ms }) => {
                self.end_time = Some(at_ms);
                RunPhase::Ended
            }
            (RunPhase::Playing | RunPhase::Ended, RunEvent::Restart) => {
                self.start_time = None;
                self.end_time = None;
                RunPhase::Ready
            }
            _ => return false,
        };
        log::info!("Run phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        true
    }

    /// Seconds on the clock: zero when ready, live while playing, frozen once ended
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        let ms = match (self.phase, self.start_time, self.end_time) {
            (RunPhase::Playing, Some(start), _) => now_ms - start,
            (RunPhase::Ended, Some(start), Some(end)) => end - start,
            _ => 0.0,
        };
        ms / 1000.0
    }

    /// Final time of a finished run
    pub fn finish_secs(&self) -> Option<f64> {
        match (self.phase, self.start_time, self.end_time) {
            (RunPhase::Ended, Some(start), Some(end)) => Some((end - start) / 1000.0),
            _ => None,
        }
    }
}
