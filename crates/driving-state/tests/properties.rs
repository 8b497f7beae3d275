//! Property tests: totality, determinism, confidence bounds, priority

use driving_state::{DrivingState, DrivingStateEngine, RuleKind, CASCADE};
use perception::{
    ActionUnit, ActionUnitReading, ActionUnitResult, Emotion, EmotionResult, InputAdapter,
    PerceptionSnapshot, ValenceArousal,
};
use proptest::prelude::*;

fn emotion_strategy() -> impl Strategy<Value = EmotionResult> {
    prop_oneof![
        (0..Emotion::ALL.len(), 0.0..1.0f64).prop_map(|(i, c)| EmotionResult::new(Emotion::ALL[i], c)),
        (0.0..1.0f64).prop_map(|c| EmotionResult::with_label("Contempt", c)),
    ]
}

fn action_units_strategy() -> impl Strategy<Value = ActionUnitResult> {
    prop::collection::vec((any::<bool>(), 0.0..1.0f64), ActionUnit::ALL.len()).prop_map(|readings| {
        ActionUnitResult::from_readings(
            ActionUnit::ALL
                .iter()
                .zip(readings)
                .map(|(&au, (present, confidence))| (au, ActionUnitReading::new(present, confidence))),
        )
    })
}

prop_compose! {
    fn snapshot_strategy()(
        valence in -1.5..1.5f64,
        arousal in -0.5..1.5f64,
        emotion in emotion_strategy(),
        action_units in action_units_strategy(),
    ) -> PerceptionSnapshot {
        PerceptionSnapshot::new(ValenceArousal::new(valence, arousal), emotion, action_units)
    }
}

proptest! {
    #[test]
    fn every_snapshot_gets_a_state(snapshot in snapshot_strategy()) {
        let verdict = DrivingStateEngine::default().evaluate(&snapshot).unwrap();
        prop_assert!(DrivingState::ALL.contains(&verdict.state_code));
    }

    #[test]
    fn evaluation_is_deterministic(snapshot in snapshot_strategy()) {
        let engine = DrivingStateEngine::default();
        let first = engine.evaluate(&snapshot).unwrap();
        let second = engine.evaluate(&snapshot.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn confidence_within_state_range(snapshot in snapshot_strategy()) {
        let verdict = DrivingStateEngine::default().evaluate(&snapshot).unwrap();
        let range = verdict.state_code.confidence_range();
        prop_assert!(
            range.contains(verdict.confidence),
            "{} confidence {} outside [{}, {}]",
            verdict.state_code, verdict.confidence, range.floor, range.ceiling
        );
    }

    #[test]
    fn risk_follows_static_table(snapshot in snapshot_strategy()) {
        let verdict = DrivingStateEngine::default().evaluate(&snapshot).unwrap();
        prop_assert_eq!((verdict.risk_level, verdict.risk_color), verdict.state_code.risk());
    }

    #[test]
    fn earliest_matching_rule_is_selected(snapshot in snapshot_strategy()) {
        let frame = InputAdapter::default().adapt(&snapshot).unwrap();
        let verdict = DrivingStateEngine::default().evaluate(&snapshot).unwrap();

        match CASCADE.iter().position(|rule| rule.matches(&frame)) {
            Some(index) => {
                prop_assert_eq!(verdict.trigger_detail.rule, CASCADE[index].kind);
                prop_assert_eq!(verdict.state_code, CASCADE[index].state);
                // No earlier rule matched
                prop_assert!(CASCADE[..index].iter().all(|rule| !rule.matches(&frame)));
            }
            None => {
                prop_assert_eq!(verdict.trigger_detail.rule, RuleKind::Default);
                prop_assert_eq!(verdict.confidence, 0.5);
            }
        }
    }
}
