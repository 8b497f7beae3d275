//! Categorical facial emotion recognition (FER)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// FER categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// Every category, in classifier output order
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "Angry",
            Emotion::Disgust => "Disgust",
            Emotion::Fear => "Fear",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Surprise => "Surprise",
            Emotion::Neutral => "Neutral",
        }
    }

    /// Parse a wire label (exact match). Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.as_str() == label)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FER output for one face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    /// Predicted label, kept verbatim so unknown labels survive decoding
    pub predicted_emotion: String,

    /// Probability of the predicted label
    pub confidence: f64,

    /// Per-category probabilities
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,

    /// Index of the predicted label in classifier order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_index: Option<usize>,
}

impl EmotionResult {
    /// Result with a single dominant category
    pub fn new(emotion: Emotion, confidence: f64) -> Self {
        let rest = ((1.0 - confidence) / 6.0).max(0.0);
        let probabilities = Emotion::ALL
            .iter()
            .map(|e| {
                let p = if *e == emotion { confidence } else { rest };
                (e.as_str().to_string(), p)
            })
            .collect();

        Self {
            predicted_emotion: emotion.as_str().to_string(),
            confidence,
            probabilities,
            emotion_index: Emotion::ALL.iter().position(|e| *e == emotion),
        }
    }

    /// Result carrying a label outside the known category set
    pub fn with_label(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            predicted_emotion: label.into(),
            confidence,
            probabilities: BTreeMap::new(),
            emotion_index: None,
        }
    }

    /// Known category of the predicted label
    pub fn emotion(&self) -> Option<Emotion> {
        Emotion::from_label(&self.predicted_emotion)
    }
}
