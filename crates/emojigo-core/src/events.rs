use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::game::{Cue, Resolution};

/// Every state change in the engine produces an Event.
/// Presentation and audio collaborators consume them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Pre-game overlay changed ("3", "2", "1", "Go!").
    PreCountdownChanged { cue: Cue },
    SessionStarted { duration_secs: u32 },
    ChallengeSpawned { label: Emotion },
    /// A valid sample was judged against the active plank.
    EmotionDetected { label: Emotion, matched: bool },
    ChallengeScored { label: Emotion, score: u32 },
    ChallengeMissed { label: Emotion },
    /// Plank scrolled off screen; the next spawn may proceed.
    ChallengeCleared { label: Emotion, resolution: Resolution },
    CountdownChanged { value: u32 },
    SessionEnded { final_score: u32 },
    SessionReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(GameEvent::ChallengeScored {
            label: Emotion::Happy,
            score: 100,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "ChallengeScored", "label": "happy", "score": 100})
        );

        let json = serde_json::to_value(GameEvent::SessionReset).unwrap();
        assert_eq!(json, serde_json::json!({"type": "SessionReset"}));
    }
}
