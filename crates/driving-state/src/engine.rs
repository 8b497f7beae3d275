//! Driving State Engine Implementation

use perception::{InputAdapter, PerceptionSnapshot, ValidationError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, Locale};
use crate::rules::{self, Rule, CASCADE};
use crate::telemetry;
use crate::verdict::DrivingStateVerdict;
use crate::EngineError;

/// Fuses perception snapshots into driving state verdicts.
///
/// Stateless after construction; share one instance across threads.
#[derive(Debug, Clone)]
pub struct DrivingStateEngine {
    adapter: InputAdapter,
    locale: Locale,
}

impl DrivingStateEngine {
    /// Create a new engine
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "Creating driving state engine (locale: {:?}, strict AU section: {})",
            config.locale, config.strict_action_units
        );
        Self {
            adapter: InputAdapter::new(config.strict_action_units),
            locale: config.locale,
        }
    }

    /// Evaluate one snapshot
    pub fn evaluate(&self, snapshot: &PerceptionSnapshot) -> Result<DrivingStateVerdict, EngineError> {
        let frame = self.adapter.adapt(snapshot).map_err(reject)?;

        let selection = rules::evaluate(&frame, self.locale);
        let (risk_level, risk_color) = selection.state.risk();

        debug!(
            "Driving state {} (confidence {:.2}, rule {:?})",
            selection.state, selection.confidence, selection.trigger_detail.rule
        );
        telemetry::record_verdict(selection.state);

        Ok(DrivingStateVerdict {
            state_code: selection.state,
            confidence: selection.confidence,
            risk_level,
            risk_color,
            display_label: selection.state.display_label(self.locale).to_string(),
            recommendation: selection.state.recommendation(self.locale).to_string(),
            trigger_detail: selection.trigger_detail,
        })
    }

    /// Decode and evaluate the perception service's JSON output
    pub fn evaluate_json(&self, value: &Value) -> Result<DrivingStateVerdict, EngineError> {
        let snapshot = PerceptionSnapshot::from_json(value).map_err(reject)?;
        self.evaluate(&snapshot)
    }

    /// Decode and evaluate JSON text
    pub fn evaluate_str(&self, input: &str) -> Result<DrivingStateVerdict, EngineError> {
        let snapshot = PerceptionSnapshot::from_json_str(input).map_err(reject)?;
        self.evaluate(&snapshot)
    }

    /// Rules in priority order
    pub fn cascade(&self) -> &'static [Rule] {
        &CASCADE
    }

    /// Presentation language
    pub fn locale(&self) -> Locale {
        self.locale
    }
}

fn reject(e: ValidationError) -> ValidationError {
    warn!("Rejected perception snapshot: {}", e);
    telemetry::record_rejected();
    e
}

impl Default for DrivingStateEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
