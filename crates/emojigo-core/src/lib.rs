//! # EmojiGo Core Library
//!
//! Game logic for EmojiGo, an AR mini-game where the player holds a facial
//! expression matching the emoji on a plank before it scrolls away. Camera,
//! rendering and the emotion classifier live outside this crate; the engine
//! consumes ticks and classifier samples and produces events.
//!
//! ## Architecture
//!
//! - **Challenge Engine**: A tick-driven state machine that owns the session,
//!   the active plank and scoring. No threads, no wall clock.
//! - **Samples**: Classifier results as discrete, timestamped values behind
//!   the [`SampleSource`] trait
//! - **Driver**: Headless loop that turns one fast tick into countdown ticks,
//!   spawn attempts and sample delivery
//! - **Config**: TOML-based tuning (vocabulary, cadences, thresholds)
//!
//! ## Key Components
//!
//! - [`ChallengeEngine`]: Core game state machine
//! - [`GameEvent`]: Everything the presentation layer reacts to
//! - [`GameConfig`]: Engine configuration
//! - [`SessionDriver`]: Headless session runner

pub mod config;
pub mod driver;
pub mod emotion;
pub mod error;
pub mod events;
pub mod game;
pub mod sample;

pub use config::{GameConfig, POINTS_PER_CHALLENGE};
pub use driver::{Cadence, SessionDriver, SessionReport};
pub use emotion::{Emotion, Vocabulary};
pub use error::{ConfigError, CoreError};
pub use events::GameEvent;
pub use game::{ChallengeEngine, Cue, Resolution, SessionState, Snapshot};
pub use sample::{EmotionSample, NoSamples, SampleSource, ScriptedSource};
