//! Emotion labels and the vocabulary a session draws challenges from.
//!
//! Labels arriving from a classifier are free text. They are normalized
//! (trimmed, lowercased) and parsed into [`Emotion`] at the boundary; the
//! engine never compares raw strings.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Contempt,
    Fear,
    Happy,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Anger,
        Emotion::Contempt,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Surprise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Contempt => "contempt",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Surprise => "surprise",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classifier label that is not one of the known emotions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmotion(pub String);

impl fmt::Display for UnknownEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emotion label '{}'", self.0)
    }
}

impl std::error::Error for UnknownEmotion {}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == normalized)
            .ok_or(UnknownEmotion(normalized))
    }
}

/// Ordered set of emotions challenges are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary(Vec<Emotion>);

impl Vocabulary {
    pub fn new(emotions: Vec<Emotion>) -> Self {
        Self(emotions)
    }

    /// fear, happy, surprise
    pub fn standard() -> Self {
        Self(vec![Emotion::Fear, Emotion::Happy, Emotion::Surprise])
    }

    /// All five plank textures.
    pub fn extended() -> Self {
        Self(Emotion::ALL.to_vec())
    }

    pub fn emotions(&self) -> &[Emotion] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, emotion: Emotion) -> bool {
        self.0.contains(&emotion)
    }

    /// Returns the first emotion listed more than once, if any.
    pub fn duplicate(&self) -> Option<Emotion> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, e)| self.0[..*i].contains(e))
            .map(|(_, e)| *e)
    }

    /// Parse and validate an external label against this vocabulary.
    pub fn recognize(&self, label: &str) -> Option<Emotion> {
        label.parse::<Emotion>().ok().filter(|e| self.contains(*e))
    }

    /// Uniform pick. `None` only for an empty vocabulary.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Emotion> {
        self.0.choose(rng).copied()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromIterator<Emotion> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = Emotion>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
