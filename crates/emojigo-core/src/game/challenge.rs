//! A single plank: its target emotion, scroll position and match progress.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Unresolved,
    Scored,
    Missed,
}

/// Outcome of judging one sample against a plank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// Plank already resolved; sample had no effect.
    Closed,
    /// Sample disagreed with the target; held time discarded.
    Mismatch,
    /// Sample matched but the hold is not long enough yet.
    Holding,
    /// This sample completed the hold.
    Scored,
}

impl Judgement {
    pub fn matched(self) -> bool {
        matches!(self, Judgement::Holding | Judgement::Scored)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    target: Emotion,
    spawned_at: Duration,
    /// 0.0 on spawn, 1.0 once off screen.
    progress: f64,
    /// Consecutive matching time since the last mismatch.
    matched: Duration,
    resolution: Resolution,
}

impl Challenge {
    pub fn new(target: Emotion, spawned_at: Duration) -> Self {
        Self {
            target,
            spawned_at,
            progress: 0.0,
            matched: Duration::ZERO,
            resolution: Resolution::Unresolved,
        }
    }

    pub fn target(&self) -> Emotion {
        self.target
    }

    pub fn spawned_at(&self) -> Duration {
        self.spawned_at
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn matched(&self) -> Duration {
        self.matched
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_unresolved(&self) -> bool {
        self.resolution == Resolution::Unresolved
    }

    /// Move one tick toward the edge of the screen.
    /// Returns `true` once the plank has left it.
    pub fn scroll(&mut self, increment: f64) -> bool {
        self.progress = (self.progress + increment).min(1.0);
        self.progress >= 1.0
    }

    /// Resolve as missed. No-op (returns `false`) if already resolved.
    pub fn miss(&mut self) -> bool {
        if !self.is_unresolved() {
            return false;
        }
        self.resolution = Resolution::Missed;
        true
    }

    /// Apply one classifier sample.
    ///
    /// A match adds `sample_interval` of held time (event-counted, so
    /// sample jitter does not matter); any mismatch starts the hold over.
    /// Reaching `threshold` scores the plank exactly once.
    pub fn judge(
        &mut self,
        detected: Emotion,
        sample_interval: Duration,
        threshold: Duration,
    ) -> Judgement {
        if !self.is_unresolved() {
            return Judgement::Closed;
        }
        if detected != self.target {
            self.matched = Duration::ZERO;
            return Judgement::Mismatch;
        }
        self.matched = self.matched.saturating_add(sample_interval);
        if self.matched >= threshold {
            self.resolution = Resolution::Scored;
            Judgement::Scored
        } else {
            Judgement::Holding
        }
    }
}

/// Read-only plank state for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub target: Emotion,
    pub spawned_at_ms: u64,
    pub progress: f64,
    pub matched_ms: u64,
    pub resolution: Resolution,
}

impl From<&Challenge> for ChallengeView {
    fn from(c: &Challenge) -> Self {
        Self {
            target: c.target,
            spawned_at_ms: c.spawned_at.as_millis() as u64,
            progress: c.progress,
            matched_ms: c.matched.as_millis() as u64,
            resolution: c.resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Duration = Duration::from_millis(500);
    const ONE: Duration = Duration::from_secs(1);

    #[test]
    fn two_consecutive_matches_score() {
        let mut c = Challenge::new(Emotion::Happy, Duration::ZERO);
        assert_eq!(c.judge(Emotion::Happy, HALF, ONE), Judgement::Holding);
        assert_eq!(c.matched(), HALF);
        assert_eq!(c.judge(Emotion::Happy, HALF, ONE), Judgement::Scored);
        assert_eq!(c.resolution(), Resolution::Scored);
    }

    #[test]
    fn mismatch_discards_partial_hold() {
        let mut c = Challenge::new(Emotion::Fear, Duration::ZERO);
        assert_eq!(c.judge(Emotion::Fear, HALF, ONE), Judgement::Holding);
        assert_eq!(c.judge(Emotion::Happy, HALF, ONE), Judgement::Mismatch);
        assert_eq!(c.matched(), Duration::ZERO);
        assert_eq!(c.judge(Emotion::Fear, HALF, ONE), Judgement::Holding);
        assert!(c.is_unresolved());
    }

    #[test]
    fn resolved_plank_ignores_samples() {
        let mut c = Challenge::new(Emotion::Happy, Duration::ZERO);
        c.judge(Emotion::Happy, ONE, ONE);
        assert_eq!(c.judge(Emotion::Happy, HALF, ONE), Judgement::Closed);
        assert_eq!(c.judge(Emotion::Fear, HALF, ONE), Judgement::Closed);
        assert_eq!(c.matched(), ONE);
        assert!(!c.miss());
        assert_eq!(c.resolution(), Resolution::Scored);
    }

    #[test]
    fn scroll_clamps_at_edge() {
        let mut c = Challenge::new(Emotion::Fear, Duration::ZERO);
        assert!(!c.scroll(0.4));
        assert!(!c.scroll(0.4));
        assert!(c.scroll(0.4));
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn miss_sets_resolution_once() {
        let mut c = Challenge::new(Emotion::Fear, Duration::ZERO);
        assert!(c.miss());
        assert!(!c.miss());
        assert_eq!(c.resolution(), Resolution::Missed);
        assert_eq!(c.judge(Emotion::Fear, ONE, ONE), Judgement::Closed);
    }
}
