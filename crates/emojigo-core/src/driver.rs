//! Headless session driver.
//!
//! Converts a single fast tick into the engine's slower inputs: the 1 s
//! countdown, spawn attempts every spawn interval, and classifier samples
//! as they become ready. A real front end would wire the same calls to its
//! render loop and timers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::game::{ChallengeEngine, SessionState, SessionStats};
use crate::sample::SampleSource;

const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Turns elapsed time into a count of periodic firings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    interval: Duration,
    elapsed: Duration,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Add `dt` and return how many intervals completed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Outcome of a driven session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub final_score: u32,
    pub finished: bool,
    pub stats: SessionStats,
    pub steps: usize,
    pub events: Vec<GameEvent>,
}

/// Owns an engine and a sample source and feeds one from the other.
#[derive(Debug)]
pub struct SessionDriver<S: SampleSource> {
    engine: ChallengeEngine,
    source: S,
    countdown: Cadence,
    spawn: Cadence,
    was_running: bool,
}

impl<S: SampleSource> SessionDriver<S> {
    pub fn new(engine: ChallengeEngine, source: S) -> Self {
        let spawn = Cadence::new(engine.config().spawn_interval());
        Self {
            engine,
            source,
            countdown: Cadence::new(COUNTDOWN_INTERVAL),
            spawn,
            was_running: false,
        }
    }

    pub fn engine(&self) -> &ChallengeEngine {
        &self.engine
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_parts(self) -> (ChallengeEngine, S) {
        (self.engine, self.source)
    }

    pub fn start(&mut self) -> Vec<GameEvent> {
        self.clear_schedule();
        self.engine.start()
    }

    /// Reset the engine and drop every pending timer so nothing scheduled
    /// before the reset fires after it.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.clear_schedule();
        self.engine.reset()
    }

    /// Advance one fast tick and apply whatever became due.
    pub fn step(&mut self, dt: Duration) -> Vec<GameEvent> {
        let mut events = self.engine.advance(dt);

        let now = self.engine.clock();
        while let Some(sample) = self.source.poll(now) {
            events.extend(self.engine.on_sample(&sample));
        }

        for _ in 0..self.countdown.advance(dt) {
            events.extend(self.engine.on_countdown_tick());
        }

        if self.engine.state() == SessionState::Running {
            if self.was_running {
                for _ in 0..self.spawn.advance(dt) {
                    events.extend(self.engine.try_spawn());
                }
            } else {
                // First spawn attempt comes one interval after "Go!"
                self.spawn.reset();
                self.was_running = true;
            }
        } else {
            self.was_running = false;
        }
        events
    }

    /// Start if needed, then step until game over or `max_steps`.
    pub fn run_until_game_over(&mut self, tick: Duration, max_steps: usize) -> SessionReport {
        let mut events = Vec::new();
        if self.engine.state() == SessionState::NotStarted {
            events.extend(self.start());
        }

        let mut steps = 0;
        while steps < max_steps && self.engine.state() != SessionState::GameOver {
            events.extend(self.step(tick));
            steps += 1;
        }

        SessionReport {
            final_score: self.engine.score(),
            finished: self.engine.state() == SessionState::GameOver,
            stats: self.engine.stats(),
            steps,
            events,
        }
    }

    fn clear_schedule(&mut self) {
        self.countdown.reset();
        self.spawn.reset();
        self.was_running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::emotion::Emotion;
    use crate::sample::{EmotionSample, NoSamples, ScriptedSource};

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn cadence_counts_whole_intervals() {
        let mut c = Cadence::new(Duration::from_millis(300));
        assert_eq!(c.advance(Duration::from_millis(200)), 0);
        assert_eq!(c.advance(Duration::from_millis(200)), 1);
        assert_eq!(c.advance(Duration::from_millis(700)), 2);
        c.reset();
        assert_eq!(c.advance(Duration::from_millis(200)), 0);
    }

    #[test]
    fn first_spawn_waits_one_interval_after_go() {
        let cfg = GameConfig::default()
            .with_vocabulary([Emotion::Happy])
            .with_seed(5);
        let mut driver = SessionDriver::new(ChallengeEngine::new(cfg).unwrap(), NoSamples);
        driver.start();

        // 3, 2, 1, Go!, then running at t=4s
        for _ in 0..40 {
            driver.step(TICK);
        }
        assert_eq!(driver.engine().state(), SessionState::Running);
        assert!(!driver.engine().is_plank_on_screen());

        let mut events = Vec::new();
        for _ in 0..30 {
            events.extend(driver.step(TICK));
        }
        assert!(events.contains(&GameEvent::ChallengeSpawned {
            label: Emotion::Happy
        }));
        assert_eq!(driver.engine().clock(), Duration::from_secs(7));
    }

    #[test]
    fn reset_cancels_pending_ticks() {
        let cfg = GameConfig::default().with_seed(5);
        let mut driver = SessionDriver::new(ChallengeEngine::new(cfg).unwrap(), NoSamples);
        driver.start();
        for _ in 0..9 {
            driver.step(TICK);
        }
        driver.reset();
        // 900 ms accumulated before the reset must not count toward the
        // next cue
        for _ in 0..9 {
            assert!(driver.step(TICK).is_empty());
        }
        assert_eq!(
            driver.step(TICK),
            vec![GameEvent::PreCountdownChanged {
                cue: crate::game::Cue::Count(2)
            }]
        );
    }

    #[test]
    fn scripted_session_scores() {
        let cfg = GameConfig::default()
            .with_vocabulary([Emotion::Happy])
            .with_session_secs(5)
            .with_seed(5);
        let source = ScriptedSource::new([
            EmotionSample::new("happy", Duration::from_millis(7500)),
            EmotionSample::new("happy", Duration::from_millis(8000)),
        ]);
        let mut driver = SessionDriver::new(ChallengeEngine::new(cfg).unwrap(), source);
        let report = driver.run_until_game_over(TICK, 1000);

        assert!(report.finished);
        assert_eq!(report.final_score, 100);
        assert_eq!(report.stats.scored, 1);
        assert_eq!(
            report.events.last(),
            Some(&GameEvent::SessionEnded { final_score: 100 })
        );
    }
}
