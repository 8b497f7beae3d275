//! Input adapter: snapshot to rule evidence

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::action_unit::ActionUnit;
use crate::emotion::Emotion;
use crate::error::ValidationError;
use crate::snapshot::PerceptionSnapshot;

/// Primitive values the rule cascade reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceFrame {
    pub valence: f64,
    pub arousal: f64,

    /// Known FER category, `None` for labels outside the fixed set
    pub emotion: Option<Emotion>,

    /// Predicted label as received
    pub emotion_label: String,

    /// Units whose `present` flag is set
    pub active_aus: BTreeSet<ActionUnit>,

    /// Number of active units
    pub au_count: usize,

    /// Mean confidence across all AU entries
    pub au_mean: f64,

    au_confidences: BTreeMap<ActionUnit, f64>,
}

impl EvidenceFrame {
    /// Whether the predicted emotion is `emotion`
    pub fn emotion_is(&self, emotion: Emotion) -> bool {
        self.emotion == Some(emotion)
    }

    /// Whether the predicted emotion is one of `set`
    pub fn emotion_in(&self, set: &[Emotion]) -> bool {
        self.emotion.map_or(false, |e| set.contains(&e))
    }

    /// Whether `au` is active
    pub fn is_active(&self, au: ActionUnit) -> bool {
        self.active_aus.contains(&au)
    }

    /// Whether any of `set` is active
    pub fn any_active(&self, set: &[ActionUnit]) -> bool {
        set.iter().any(|au| self.active_aus.contains(au))
    }

    /// Active units among `set`, in model order
    pub fn active_among(&self, set: &[ActionUnit]) -> Vec<ActionUnit> {
        self.active_aus
            .iter()
            .copied()
            .filter(|au| set.contains(au))
            .collect()
    }

    /// Raw activation probability of `au`, if the snapshot carried it
    pub fn confidence_of(&self, au: ActionUnit) -> Option<f64> {
        self.au_confidences.get(&au).copied()
    }
}

/// Validates snapshots and reduces them to an [`EvidenceFrame`]
#[derive(Debug, Clone)]
pub struct InputAdapter {
    /// Require an entry for every one of the 17 action units
    strict_action_units: bool,
}

impl InputAdapter {
    /// Adapter that optionally requires all 17 AU entries
    pub fn new(strict_action_units: bool) -> Self {
        Self { strict_action_units }
    }

    /// Extract rule evidence. Values are not clamped.
    pub fn adapt(&self, snapshot: &PerceptionSnapshot) -> Result<EvidenceFrame, ValidationError> {
        let va = &snapshot.valence_arousal;
        ensure_finite("valence", va.valence)?;
        ensure_finite("arousal", va.arousal)?;
        ensure_finite("Emotion_Classification.confidence", snapshot.emotion.confidence)?;

        let readings = &snapshot.action_units.detailed_results;
        if self.strict_action_units {
            if let Some(missing) = ActionUnit::ALL.iter().find(|au| !readings.contains_key(au)) {
                warn!("AU section is missing {}", missing);
                return Err(ValidationError::MissingActionUnit(*missing));
            }
        }

        let mut au_confidences = BTreeMap::new();
        for (au, reading) in readings {
            if !reading.confidence.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    field: format!("{}.confidence", au),
                });
            }
            au_confidences.insert(*au, reading.confidence);
        }

        let active_aus: BTreeSet<ActionUnit> = snapshot.action_units.active().collect();
        let au_mean = if au_confidences.is_empty() {
            0.0
        } else {
            au_confidences.values().sum::<f64>() / au_confidences.len() as f64
        };

        let emotion = snapshot.emotion.emotion();
        if emotion.is_none() {
            debug!(
                "Unrecognized emotion label '{}', no category rule will match",
                snapshot.emotion.predicted_emotion
            );
        }

        Ok(EvidenceFrame {
            valence: va.valence,
            arousal: va.arousal,
            emotion,
            emotion_label: snapshot.emotion.predicted_emotion.clone(),
            au_count: active_aus.len(),
            active_aus,
            au_mean,
            au_confidences,
        })
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue {
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_unit::{ActionUnitReading, ActionUnitResult};
    use crate::emotion::EmotionResult;
    use crate::snapshot::ValenceArousal;
    use proptest::prelude::*;

    fn snapshot(valence: f64, arousal: f64, emotion: Emotion, active: &[ActionUnit]) -> PerceptionSnapshot {
        PerceptionSnapshot::new(
            ValenceArousal::new(valence, arousal),
            EmotionResult::new(emotion, 0.8),
            ActionUnitResult::with_active(active, 0.9, 0.1),
        )
    }

    #[test]
    fn test_extracts_primitives() {
        let adapter = InputAdapter::default();
        let frame = adapter
            .adapt(&snapshot(0.2, 0.4, Emotion::Happy, &[ActionUnit::Au6, ActionUnit::Au12]))
            .unwrap();

        assert_eq!(frame.valence, 0.2);
        assert_eq!(frame.arousal, 0.4);
        assert!(frame.emotion_is(Emotion::Happy));
        assert_eq!(frame.au_count, 2);
        assert!(frame.is_active(ActionUnit::Au12));
        assert!(!frame.is_active(ActionUnit::Au4));
        // (2 * 0.9 + 15 * 0.1) / 17
        assert!((frame.au_mean - 3.3 / 17.0).abs() < 1e-9);
        assert_eq!(frame.confidence_of(ActionUnit::Au6), Some(0.9));
    }

    #[test]
    fn test_no_clamping() {
        let frame = InputAdapter::default()
            .adapt(&snapshot(-2.0, 1.4, Emotion::Neutral, &[]))
            .unwrap();
        assert_eq!(frame.valence, -2.0);
        assert_eq!(frame.arousal, 1.4);
    }

    #[test]
    fn test_strict_mode_requires_all_units() {
        let mut snap = snapshot(0.0, 0.5, Emotion::Neutral, &[]);
        snap.action_units.detailed_results.remove(&ActionUnit::Au17);

        let err = InputAdapter::new(true).adapt(&snap).unwrap_err();
        assert_eq!(err, ValidationError::MissingActionUnit(ActionUnit::Au17));

        let frame = InputAdapter::new(false).adapt(&snap).unwrap();
        assert!((frame.au_mean - 0.1).abs() < 1e-9);
        assert_eq!(frame.confidence_of(ActionUnit::Au17), None);
    }

    #[test]
    fn test_lenient_mode_empty_section_means_zero() {
        let snap = PerceptionSnapshot::new(
            ValenceArousal::new(0.0, 0.5),
            EmotionResult::new(Emotion::Neutral, 0.8),
            ActionUnitResult::default(),
        );

        let frame = InputAdapter::new(false).adapt(&snap).unwrap();
        assert_eq!(frame.au_count, 0);
        assert_eq!(frame.au_mean, 0.0);
    }

    #[test]
    fn test_active_set_follows_present_flags() {
        let mut snap = snapshot(0.0, 0.5, Emotion::Neutral, &[]);
        // Informational list disagrees with the readings; readings win
        snap.action_units.active_aus = Some(vec!["AU1".into(), "AU2".into()]);
        snap.action_units
            .detailed_results
            .insert(ActionUnit::Au5, ActionUnitReading::new(true, 0.55));

        let frame = InputAdapter::default().adapt(&snap).unwrap();
        assert_eq!(frame.active_aus.iter().copied().collect::<Vec<_>>(), vec![ActionUnit::Au5]);
    }

    #[test]
    fn test_unknown_emotion_has_no_category() {
        let mut snap = snapshot(0.0, 0.5, Emotion::Neutral, &[]);
        snap.emotion = EmotionResult::with_label("Contempt", 0.9);

        let frame = InputAdapter::default().adapt(&snap).unwrap();
        assert_eq!(frame.emotion, None);
        assert_eq!(frame.emotion_label, "Contempt");
        assert!(!frame.emotion_in(&Emotion::ALL));
    }

    #[test]
    fn test_non_finite_rejected() {
        let snap = snapshot(f64::NAN, 0.5, Emotion::Neutral, &[]);
        assert!(matches!(
            InputAdapter::default().adapt(&snap),
            Err(ValidationError::NonFiniteValue { .. })
        ));

        let mut snap = snapshot(0.1, 0.15, Emotion::Sad, &[]);
        snap.emotion = EmotionResult::new(Emotion::Sad, f64::NAN);
        assert_eq!(
            InputAdapter::default().adapt(&snap).unwrap_err(),
            ValidationError::NonFiniteValue {
                field: "Emotion_Classification.confidence".into()
            }
        );

        let mut snap = snapshot(0.0, 0.5, Emotion::Neutral, &[]);
        snap.action_units
            .detailed_results
            .insert(ActionUnit::Au9, ActionUnitReading::new(false, f64::INFINITY));
        assert_eq!(
            InputAdapter::default().adapt(&snap).unwrap_err(),
            ValidationError::NonFiniteValue {
                field: "AU9.confidence".into()
            }
        );
    }

    proptest! {
        #[test]
        fn prop_counts_follow_present_flags(
            readings in prop::collection::vec((any::<bool>(), 0.0..1.0f64), 17),
        ) {
            let snap = PerceptionSnapshot::new(
                ValenceArousal::new(0.0, 0.5),
                EmotionResult::new(Emotion::Neutral, 0.8),
                ActionUnitResult::from_readings(
                    ActionUnit::ALL
                        .iter()
                        .zip(readings.iter())
                        .map(|(&au, &(present, confidence))| (au, ActionUnitReading::new(present, confidence))),
                ),
            );

            let frame = InputAdapter::default().adapt(&snap).unwrap();
            let present = readings.iter().filter(|(p, _)| *p).count();
            prop_assert_eq!(frame.au_count, present);
            prop_assert_eq!(frame.active_aus.len(), present);

            let min = readings.iter().map(|r| r.1).fold(f64::MAX, f64::min);
            let max = readings.iter().map(|r| r.1).fold(f64::MIN, f64::max);
            prop_assert!(frame.au_mean >= min - 1e-12 && frame.au_mean <= max + 1e-12);
        }
    }

    #[test]
    fn test_active_among_preserves_model_order() {
        let frame = InputAdapter::default()
            .adapt(&snapshot(0.0, 0.7, Emotion::Angry, &[ActionUnit::Au23, ActionUnit::Au4]))
            .unwrap();
        assert_eq!(
            frame.active_among(&[ActionUnit::Au7, ActionUnit::Au23, ActionUnit::Au4]),
            vec![ActionUnit::Au4, ActionUnit::Au23]
        );
    }
}
