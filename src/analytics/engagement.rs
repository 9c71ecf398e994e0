//! Interaction counting and engagement scoring

use crate::state::{Step, TOTAL_STEPS};
use std::time::{Duration, Instant};

/// Counts user interactions since the form started
#[derive(Debug, Clone)]
pub struct EngagementTracker {
    started_at: Instant,
    pub clicks: u64,
    pub keystrokes: u64,
}

impl EngagementTracker {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            clicks: 0,
            keystrokes: 0,
        }
    }

    pub fn record_keystroke(&mut self) {
        self.keystrokes += 1;
    }

    pub fn record_click(&mut self) {
        self.clicks += 1;
    }

    pub fn total_interactions(&self) -> u64 {
        self.clicks + self.keystrokes
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Score out of 20: up to 5 for time spent (one per minute), up to 5 for
    /// interactions (one per 20), up to 10 for progress through the steps.
    pub fn score(&self, now: Instant, step: Step) -> u32 {
        let minutes = self.elapsed(now).as_secs_f64() / 60.0;
        let time_score = minutes.min(5.0);
        let interaction_score = (self.total_interactions() as f64 / 20.0).min(5.0);
        let progress_score = f64::from(step.number()) / f64::from(TOTAL_STEPS) * 10.0;
        (time_score + interaction_score + progress_score).round() as u32
    }
}
