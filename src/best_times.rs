//! Fastest-finish leaderboard
//!
//! Persisted to LocalStorage, tracks the 10 best times per course length
//! (obstacle count). Entries of every length share one list sorted by time.

use serde::{Deserialize, Serialize};

/// Maximum number of times kept per course length
pub const MAX_BEST_TIMES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestTimeEntry {
    /// Finish time in seconds
    pub seconds: f64,
    /// Obstacle count of the course
    pub blocks: usize,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Leaderboard, fastest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestTimes {
    pub entries: Vec<BestTimeEntry>,
}

impl BestTimes {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "marble_dash_best_times";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Times recorded on courses with `blocks` obstacles, fastest first
    pub fn for_course(&self, blocks: usize) -> impl Iterator<Item = &BestTimeEntry> {
        self.entries.iter().filter(move |e| e.blocks == blocks)
    }

    /// Check if a time makes the board for its course length
    pub fn qualifies(&self, seconds: f64, blocks: usize) -> bool {
        if !seconds.is_finite() || seconds <= 0.0 {
            return false;
        }
        match self.for_course(blocks).nth(MAX_BEST_TIMES - 1) {
            Some(slowest) => seconds < slowest.seconds,
            None => true,
        }
    }

    /// Record a finish. Returns the rank achieved among runs of the same
    /// course length (1-indexed) or None.
    pub fn add_time(&mut self, seconds: f64, blocks: usize, timestamp: f64) -> Option<usize> {
        if !self.qualifies(seconds, blocks) {
            return None;
        }

        // Ties keep the earlier run ahead
        let rank = self.for_course(blocks).filter(|e| e.seconds <= seconds).count() + 1;
        let at = self
            .entries
            .iter()
            .position(|e| seconds < e.seconds)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            BestTimeEntry {
                seconds,
                blocks,
                timestamp,
            },
        );

        // Drop whatever fell off this course's board
        let mut kept = 0;
        self.entries.retain(|e| {
            if e.blocks != blocks {
                return true;
            }
            kept += 1;
            kept <= MAX_BEST_TIMES
        });

        log::info!("New best time #{} ({} blocks): {:.2}s", rank, blocks, seconds);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest time on a course with `blocks` obstacles
    pub fn best(&self, blocks: usize) -> Option<f64> {
        self.for_course(blocks).next().map(|e| e.seconds)
    }

    /// Load best times from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(times) = serde_json::from_str::<BestTimes>(&json) {
                    log::info!("Loaded {} best times", times.entries.len());
                    return times;
                }
            }
        }

        Self::new()
    }

    /// Save best times to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_rank() {
        let mut times = BestTimes::new();
        assert_eq!(times.add_time(12.5, 5, 0.0), Some(1));
        assert_eq!(times.add_time(9.0, 5, 1.0), Some(1));
        assert_eq!(times.add_time(20.0, 5, 2.0), Some(3));
        assert_eq!(times.add_time(12.5, 5, 3.0), Some(3));
        assert_eq!(times.best(5), Some(9.0));

        let secs: Vec<_> = times.entries.iter().map(|e| e.seconds).collect();
        assert_eq!(secs, vec![9.0, 12.5, 12.5, 20.0]);
        // The earlier 12.5 stays ahead
        assert_eq!(times.entries[1].timestamp, 0.0);
    }

    #[test]
    fn test_board_is_capped() {
        let mut times = BestTimes::new();
        for i in 0..MAX_BEST_TIMES {
            times.add_time(10.0 + i as f64, 5, 0.0);
        }
        assert!(!times.qualifies(30.0, 5));
        assert_eq!(times.add_time(30.0, 5, 0.0), None);
        assert_eq!(times.add_time(1.0, 5, 0.0), Some(1));
        assert_eq!(times.entries.len(), MAX_BEST_TIMES);
        assert_eq!(times.entries.last().map(|e| e.seconds), Some(18.0));
    }

    #[test]
    fn test_rejects_nonsense() {
        let mut times = BestTimes::new();
        assert_eq!(times.add_time(0.0, 5, 0.0), None);
        assert_eq!(times.add_time(f64::NAN, 5, 0.0), None);
        assert!(times.is_empty());
    }

    #[test]
    fn test_boards_split_by_course_length() {
        let mut times = BestTimes::new();
        for i in 0..MAX_BEST_TIMES {
            times.add_time(20.0 + i as f64, 5, 0.0);
        }
        // An empty course never pushes longer runs off their board
        assert_eq!(times.add_time(2.0, 0, 1.0), Some(1));
        assert_eq!(times.add_time(21.5, 0, 2.0), Some(2));
        assert_eq!(times.for_course(5).count(), MAX_BEST_TIMES);
        assert_eq!(times.best(5), Some(20.0));
        assert_eq!(times.best(0), Some(2.0));
        assert_eq!(times.best(3), None);

        assert!(!times.qualifies(40.0, 5));
        assert!(times.qualifies(40.0, 3));
        assert_eq!(times.add_time(20.5, 5, 3.0), Some(2));
        assert_eq!(times.for_course(5).count(), MAX_BEST_TIMES);
        assert_eq!(times.for_course(5).last().map(|e| e.seconds), Some(28.0));
        assert_eq!(times.entries.len(), MAX_BEST_TIMES + 2);
    }
}
