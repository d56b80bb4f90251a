//! Session lifecycle: pre-game cues, the play countdown and the score.
//!
//! ```text
//! NotStarted -> PreCountdown -> Running -> GameOver
//!                    ^                         |
//!                    +-------- reset() --------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    PreCountdown,
    Running,
    GameOver,
}

/// One step of the presentational "3, 2, 1, Go!" overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cue {
    Count(u32),
    Go,
}

impl Cue {
    /// First cue of a sequence counting down from `from`.
    pub fn first(from: u32) -> Self {
        if from == 0 {
            Cue::Go
        } else {
            Cue::Count(from)
        }
    }

    /// `None` once "Go!" has been shown.
    pub fn next(self) -> Option<Cue> {
        match self {
            Cue::Count(n) if n > 1 => Some(Cue::Count(n - 1)),
            Cue::Count(_) => Some(Cue::Go),
            Cue::Go => None,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Count(n) => write!(f, "{n}"),
            Cue::Go => f.write_str("Go!"),
        }
    }
}

impl From<Cue> for String {
    fn from(cue: Cue) -> Self {
        cue.to_string()
    }
}

impl TryFrom<String> for Cue {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "Go!" {
            return Ok(Cue::Go);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Cue::Count(n)),
            _ => Err(format!("invalid countdown cue '{s}'")),
        }
    }
}

/// Per-session tallies for the game-over summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub spawned: u32,
    pub scored: u32,
    pub missed: u32,
}

/// Score, countdown and lifecycle state for one play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    state: SessionState,
    cue: Option<Cue>,
    countdown_remaining: u32,
    score: u32,
    stats: SessionStats,
}

impl GameSession {
    pub fn new(session_secs: u32) -> Self {
        Self {
            state: SessionState::NotStarted,
            cue: None,
            countdown_remaining: session_secs,
            score: 0,
            stats: SessionStats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cue(&self) -> Option<Cue> {
        self.cue
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Reinitialize every field and show the first cue.
    pub fn reset(&mut self, session_secs: u32, pre_countdown_secs: u32) -> Cue {
        let cue = Cue::first(pre_countdown_secs);
        *self = Self {
            state: SessionState::PreCountdown,
            cue: Some(cue),
            ..Self::new(session_secs)
        };
        cue
    }

    /// Step the overlay. Returns `None` when the sequence is exhausted
    /// and play should begin.
    pub fn next_cue(&mut self) -> Option<Cue> {
        if self.state != SessionState::PreCountdown {
            return None;
        }
        self.cue = self.cue.and_then(Cue::next);
        self.cue
    }

    pub fn begin_play(&mut self, session_secs: u32) {
        self.state = SessionState::Running;
        self.cue = None;
        self.score = 0;
        self.countdown_remaining = session_secs;
    }

    /// One second elapsed. Enters `GameOver` on reaching zero.
    pub fn count_down(&mut self) -> u32 {
        if self.state == SessionState::Running {
            self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
            if self.countdown_remaining == 0 {
                self.state = SessionState::GameOver;
            }
        }
        self.countdown_remaining
    }

    pub fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.stats.scored += 1;
        self.score
    }

    pub fn record_spawn(&mut self) {
        self.stats.spawned += 1;
    }

    pub fn record_miss(&mut self) {
        self.stats.missed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_sequence_counts_down_to_go() {
        let mut cue = Some(Cue::first(3));
        let mut seen = Vec::new();
        while let Some(c) = cue {
            seen.push(c.to_string());
            cue = c.next();
        }
        assert_eq!(seen, ["3", "2", "1", "Go!"]);
        assert_eq!(Cue::first(0), Cue::Go);
    }

    #[test]
    fn cue_serializes_as_overlay_text() {
        assert_eq!(serde_json::to_string(&Cue::Count(2)).unwrap(), r#""2""#);
        assert_eq!(serde_json::to_string(&Cue::Go).unwrap(), r#""Go!""#);
        assert_eq!(serde_json::from_str::<Cue>(r#""Go!""#).unwrap(), Cue::Go);
        assert!(serde_json::from_str::<Cue>(r#""0""#).is_err());
    }

    #[test]
    fn countdown_reaches_zero_then_game_over() {
        let mut session = GameSession::new(2);
        session.reset(2, 0);
        assert_eq!(session.next_cue(), None);
        session.begin_play(2);
        assert_eq!(session.count_down(), 1);
        assert!(session.is_running());
        assert_eq!(session.count_down(), 0);
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.count_down(), 0);
    }

    #[test]
    fn count_down_ignored_outside_play() {
        let mut session = GameSession::new(5);
        assert_eq!(session.count_down(), 5);
        session.reset(5, 3);
        assert_eq!(session.count_down(), 5);
    }

    #[test]
    fn reset_clears_score_and_stats() {
        let mut session = GameSession::new(10);
        session.reset(10, 3);
        session.begin_play(10);
        session.record_spawn();
        session.award(100);
        session.count_down();
        assert_eq!(session.score(), 100);

        assert_eq!(session.reset(10, 3), Cue::Count(3));
        assert_eq!(session.state(), SessionState::PreCountdown);
        assert_eq!(session.score(), 0);
        assert_eq!(session.countdown_remaining(), 10);
        assert_eq!(session.stats(), SessionStats::default());
    }
}
