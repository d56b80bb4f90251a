//! Challenge engine implementation.
//!
//! The engine is an owned, single-writer state machine. It does not use
//! internal threads or read the wall clock - game time only moves when the
//! caller invokes `advance(dt)`. Every command returns the events it caused,
//! in order.
//!
//! ## Inputs
//!
//! ```text
//! advance(dt)            fast render tick (~30 ms): clock, plank scroll
//! on_countdown_tick()    once per second: pre-game cues, play countdown
//! try_spawn()            every spawn interval: new plank if none on screen
//! on_emotion_sample(..)  classifier result, whenever one arrives
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ChallengeEngine::new(GameConfig::default())?;
//! engine.start();
//! // In a loop:
//! let events = engine.advance(tick);
//! ```

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::challenge::{Challenge, ChallengeView, Judgement, Resolution};
use super::session::{Cue, GameSession, SessionState, SessionStats};
use crate::config::{GameConfig, POINTS_PER_CHALLENGE};
use crate::emotion::Emotion;
use crate::error::ConfigError;
use crate::events::GameEvent;
use crate::sample::EmotionSample;

/// The most recent sample judged against a plank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub emotion: Emotion,
    pub matched: bool,
}

/// Read-only view of the engine for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub pre_countdown: Option<Cue>,
    pub countdown_remaining: u32,
    pub score: u32,
    pub active_challenge: Option<ChallengeView>,
    pub last_resolution: Option<Resolution>,
    pub last_detection: Option<Detection>,
    pub stats: SessionStats,
    pub clock_ms: u64,
}

/// Core challenge engine.
#[derive(Debug, Clone)]
pub struct ChallengeEngine {
    config: GameConfig,
    session: GameSession,
    /// The plank on screen, scored or not.
    active: Option<Challenge>,
    /// Spawn gate; open only while a session is running.
    spawning: bool,
    /// Game time since construction.
    clock: Duration,
    /// Clock value at the last start/reset. Older samples are stale.
    epoch: Duration,
    last_sample_at: Option<Duration>,
    last_resolution: Option<Resolution>,
    last_detection: Option<Detection>,
    rng: Mcg128Xsl64,
}

impl ChallengeEngine {
    /// Create an engine in the `NotStarted` state.
    ///
    /// # Errors
    ///
    /// Returns the first problem found by [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            session: GameSession::new(config.session_secs),
            config,
            active: None,
            spawning: false,
            clock: Duration::ZERO,
            epoch: Duration::ZERO,
            last_sample_at: None,
            last_resolution: None,
            last_detection: None,
            rng,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.session.countdown_remaining()
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active.as_ref()
    }

    pub fn is_plank_on_screen(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_resolution(&self) -> Option<Resolution> {
        self.last_resolution
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.session.state(),
            pre_countdown: self.session.cue(),
            countdown_remaining: self.session.countdown_remaining(),
            score: self.session.score(),
            active_challenge: self.active.as_ref().map(ChallengeView::from),
            last_resolution: self.last_resolution,
            last_detection: self.last_detection,
            stats: self.session.stats(),
            clock_ms: self.clock.as_millis() as u64,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the pre-game countdown. Only valid from `NotStarted`;
    /// a finished session must be `reset()` instead.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.session.state() != SessionState::NotStarted {
            debug!(state = ?self.session.state(), "start ignored");
            return Vec::new();
        }
        self.restart()
    }

    /// Return to the first pre-game cue with a zeroed score, discarding the
    /// plank and anything timestamped before now. Valid from any state.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        info!(score = self.session.score(), "session reset");
        let mut events = vec![GameEvent::SessionReset];
        events.extend(self.restart());
        events
    }

    /// Once-per-second input. Steps the pre-game cues, then the play
    /// countdown.
    pub fn on_countdown_tick(&mut self) -> Vec<GameEvent> {
        match self.session.state() {
            SessionState::PreCountdown => match self.session.next_cue() {
                Some(cue) => vec![GameEvent::PreCountdownChanged { cue }],
                None => self.begin_play(),
            },
            SessionState::Running => {
                let value = self.session.count_down();
                let mut events = vec![GameEvent::CountdownChanged { value }];
                if self.session.state() == SessionState::GameOver {
                    events.extend(self.end_session());
                }
                events
            }
            SessionState::NotStarted | SessionState::GameOver => Vec::new(),
        }
    }

    /// Spawn a plank if a session is running and none is on screen.
    pub fn try_spawn(&mut self) -> Vec<GameEvent> {
        if !self.session.is_running() || !self.spawning {
            debug!(state = ?self.session.state(), "spawn ignored: not running");
            return Vec::new();
        }
        if self.active.is_some() {
            debug!("spawn ignored: plank on screen");
            return Vec::new();
        }
        let Some(target) = self.config.vocabulary.choose(&mut self.rng) else {
            return Vec::new();
        };

        self.active = Some(Challenge::new(target, self.clock));
        self.session.record_spawn();
        info!(label = %target, at_ms = self.clock.as_millis() as u64, "challenge spawned");
        vec![GameEvent::ChallengeSpawned { label: target }]
    }

    /// Fast-tick input. Moves game time and scrolls the plank.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        self.clock = self.clock.saturating_add(dt);
        if !self.session.is_running() {
            return Vec::new();
        }
        let Some(challenge) = self.active.as_mut() else {
            return Vec::new();
        };
        if !challenge.scroll(self.config.scroll_increment) {
            return Vec::new();
        }

        let mut events = Vec::new();
        let label = challenge.target();
        if challenge.miss() {
            self.session.record_miss();
            info!(label = %label, "challenge missed");
            events.push(GameEvent::ChallengeMissed { label });
        }
        let resolution = challenge.resolution();
        self.active = None;
        self.last_resolution = Some(resolution);
        events.push(GameEvent::ChallengeCleared { label, resolution });
        events
    }

    /// Feed one classifier result observed at game time `at`.
    pub fn on_emotion_sample(&mut self, label: &str, at: Duration) -> Vec<GameEvent> {
        if !self.session.is_running() {
            debug!(label, state = ?self.session.state(), "sample ignored: not running");
            return Vec::new();
        }
        if at < self.epoch || self.last_sample_at.is_some_and(|last| at < last) {
            debug!(label, at_ms = at.as_millis() as u64, "sample ignored: stale");
            return Vec::new();
        }
        let Some(emotion) = self.config.vocabulary.recognize(label) else {
            debug!(label, "sample ignored: unrecognized label");
            return Vec::new();
        };
        self.last_sample_at = Some(at);

        let Some(challenge) = self.active.as_mut().filter(|c| c.is_unresolved()) else {
            debug!(label = %emotion, "sample ignored: no unresolved plank");
            return Vec::new();
        };
        // Observed before this plank existed
        if at < challenge.spawned_at() {
            debug!(
                label = %emotion,
                at_ms = at.as_millis() as u64,
                "sample ignored: predates plank"
            );
            return Vec::new();
        }
        let target = challenge.target();
        let judgement = challenge.judge(
            emotion,
            self.config.sample_interval(),
            self.config.match_threshold(),
        );

        let matched = judgement.matched();
        self.last_detection = Some(Detection { emotion, matched });
        let mut events = vec![GameEvent::EmotionDetected {
            label: emotion,
            matched,
        }];
        if judgement == Judgement::Scored {
            let score = self.session.award(POINTS_PER_CHALLENGE);
            info!(label = %target, score, "challenge scored");
            events.push(GameEvent::ChallengeScored {
                label: target,
                score,
            });
        }
        events
    }

    /// Convenience wrapper for a sample produced by a [`crate::SampleSource`].
    pub fn on_sample(&mut self, sample: &EmotionSample) -> Vec<GameEvent> {
        self.on_emotion_sample(&sample.label, sample.observed_at)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restart(&mut self) -> Vec<GameEvent> {
        let cue = self
            .session
            .reset(self.config.session_secs, self.config.pre_countdown_secs);
        self.active = None;
        self.spawning = false;
        self.epoch = self.clock;
        self.last_sample_at = None;
        self.last_resolution = None;
        self.last_detection = None;
        vec![GameEvent::PreCountdownChanged { cue }]
    }

    fn begin_play(&mut self) -> Vec<GameEvent> {
        let secs = self.config.session_secs;
        self.session.begin_play(secs);
        self.spawning = true;
        info!(duration_secs = secs, "session started");
        vec![
            GameEvent::SessionStarted { duration_secs: secs },
            GameEvent::CountdownChanged { value: secs },
        ]
    }

    fn end_session(&mut self) -> Vec<GameEvent> {
        self.spawning = false;
        let final_score = self.session.score();
        info!(final_score, "session ended");
        vec![GameEvent::SessionEnded { final_score }]
    }
}
