mod challenge;
mod engine;
mod session;

pub use challenge::{Challenge, ChallengeView, Judgement, Resolution};
pub use engine::{ChallengeEngine, Detection, Snapshot};
pub use session::{Cue, GameSession, SessionState, SessionStats};
