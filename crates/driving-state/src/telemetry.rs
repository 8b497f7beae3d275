//! Logging setup and verdict metrics

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::state::DrivingState;
use crate::EngineError;

/// Counter of produced verdicts, labelled by `state`
pub const VERDICTS_TOTAL: &str = "driving_state_verdicts_total";

/// Counter of snapshots rejected as malformed
pub const REJECTED_TOTAL: &str = "driving_state_rejected_snapshots_total";

/// Install a global fmt subscriber at `level` (e.g. "info", "debug").
///
/// Call once from the embedding gateway.
pub fn init_logging(level: &str) -> Result<(), EngineError> {
    let level: Level = level
        .parse()
        .map_err(|_| EngineError::Config(format!("invalid log level: {}", level)))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| EngineError::Logging(e.to_string()))
}

pub(crate) fn record_verdict(state: DrivingState) {
    metrics::counter!(VERDICTS_TOTAL, "state" => state.as_str()).increment(1);
}

pub(crate) fn record_rejected() {
    metrics::counter!(REJECTED_TOTAL).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrivingStateEngine;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use perception::{ActionUnit, ActionUnitResult, Emotion, EmotionResult, PerceptionSnapshot, ValenceArousal};

    /// Counter totals as (name, state label, value), taken in one snapshot
    fn counters(snapshotter: &Snapshotter) -> Vec<(String, Option<String>, u64)> {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(n) => {
                    let key = key.key();
                    let state = key
                        .labels()
                        .find(|l| l.key() == "state")
                        .map(|l| l.value().to_string());
                    Some((key.name().to_string(), state, n))
                }
                _ => None,
            })
            .collect()
    }

    fn total(counters: &[(String, Option<String>, u64)], name: &str, state: Option<&str>) -> u64 {
        counters
            .iter()
            .filter(|(n, s, _)| n == name && state.map_or(true, |want| s.as_deref() == Some(want)))
            .map(|(_, _, v)| v)
            .sum()
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(matches!(init_logging("chatty"), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_counters_record_verdicts_and_rejections() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let engine = DrivingStateEngine::default();

        let drowsy = PerceptionSnapshot::new(
            ValenceArousal::new(0.1, 0.15),
            EmotionResult::new(Emotion::Sad, 0.8),
            ActionUnitResult::with_active(&[], 0.9, 0.1),
        );
        let mut incomplete = drowsy.clone();
        incomplete.action_units.detailed_results.remove(&ActionUnit::Au1);

        metrics::with_local_recorder(&recorder, || {
            assert!(engine.evaluate(&drowsy).is_ok());
            assert!(engine.evaluate_str("not json").is_err());
            assert!(engine.evaluate_json(&serde_json::json!({})).is_err());
            assert!(engine.evaluate(&incomplete).is_err());
        });

        let counters = counters(&snapshotter);
        assert_eq!(total(&counters, VERDICTS_TOTAL, Some("drowsy")), 1);
        assert_eq!(total(&counters, VERDICTS_TOTAL, None), 1);
        assert_eq!(total(&counters, REJECTED_TOTAL, None), 3);
    }
}
