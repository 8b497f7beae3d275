//! Per-state confidence scoring
//!
//! Each scorer sums independent evidence weights and clamps the sum to the
//! state's [`ConfidenceRange`]. Graded thresholds on one channel are
//! exclusive: the coarser weight only applies when the finer guard fails.

use perception::{ActionUnit, Emotion, EvidenceFrame};

use crate::state::DrivingState;

/// Confidence of the default relaxed verdict
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Confidence of the sad verdict
pub const SAD_CONFIDENCE: f64 = 0.7;

/// Additive evidence accumulator
#[derive(Debug, Default)]
struct Score(f64);

impl Score {
    fn add_if(&mut self, guard: bool, weight: f64) -> &mut Self {
        if guard {
            self.0 += weight;
        }
        self
    }

    /// First matching tier contributes, the rest are skipped
    fn add_first(&mut self, tiers: &[(bool, f64)]) -> &mut Self {
        if let Some((_, weight)) = tiers.iter().find(|(guard, _)| *guard) {
            self.0 += weight;
        }
        self
    }

    fn clamped(&self, state: DrivingState) -> f64 {
        state.confidence_range().clamp(self.0)
    }
}

fn au_confidence_above(frame: &EvidenceFrame, au: ActionUnit, threshold: f64) -> bool {
    frame.confidence_of(au).map_or(false, |c| c > threshold)
}

/// Tiered weights over low arousal and valence plus AU inactivity
pub fn drowsy(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_first(&[(frame.arousal < 0.15, 0.4), (frame.arousal < 0.25, 0.3)])
        .add_first(&[(frame.valence < 0.2, 0.3), (frame.valence < 0.3, 0.2)])
        .add_first(&[(frame.au_count <= 2, 0.3), (frame.au_count <= 3, 0.2)])
        .clamped(DrivingState::Drowsy)
}

/// Angry face plus negative activation; AU4 above 0.6 adds a bonus
pub fn angry(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_if(frame.emotion_is(Emotion::Angry), 0.4)
        .add_if(frame.valence < 0.2 && frame.arousal > 0.65, 0.3)
        .add_if(au_confidence_above(frame, ActionUnit::Au4, 0.6), 0.3)
        .clamped(DrivingState::Angry)
}

/// Negative activation with fear or disgust; AU4 above 0.5 adds a bonus
pub fn stressed(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_if(frame.arousal > 0.6 && frame.valence < 0.3, 0.35)
        .add_if(frame.emotion_in(&[Emotion::Fear, Emotion::Disgust]), 0.35)
        .add_if(au_confidence_above(frame, ActionUnit::Au4, 0.5), 0.3)
        .clamped(DrivingState::Stressed)
}

/// Arousal above 0.7 plus an engaged face or raised brow
pub fn alert(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_if(frame.arousal > 0.7, 0.4)
        .add_if(frame.emotion_in(&[Emotion::Surprise, Emotion::Happy]), 0.3)
        .add_if(
            frame.any_active(&[ActionUnit::Au1, ActionUnit::Au2, ActionUnit::Au5]),
            0.3,
        )
        .clamped(DrivingState::Alert)
}

/// Sparse AU activity with a flat face
pub fn distracted(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_if(frame.au_count <= 2, 0.4)
        .add_if(frame.emotion_in(&[Emotion::Sad, Emotion::Neutral]), 0.3)
        .add_if(frame.arousal > 0.2 && frame.arousal < 0.5, 0.3)
        .clamped(DrivingState::Distracted)
}

/// Proportional to arousal, capped at 0.9
pub fn surprised(frame: &EvidenceFrame) -> f64 {
    (frame.arousal * 0.8).min(0.9)
}

/// Fixed
pub fn sad(_frame: &EvidenceFrame) -> f64 {
    SAD_CONFIDENCE
}

/// Moderate arousal with positive valence and a pleasant face
pub fn relaxed(frame: &EvidenceFrame) -> f64 {
    Score::default()
        .add_if((0.3..=0.7).contains(&frame.arousal), 0.35)
        .add_if(frame.valence > 0.3, 0.35)
        .add_if(frame.emotion_in(&[Emotion::Neutral, Emotion::Happy]), 0.3)
        .clamped(DrivingState::Relaxed)
}
