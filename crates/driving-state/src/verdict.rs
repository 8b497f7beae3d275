//! Verdict and diagnostic trigger detail

use perception::{ActionUnit, PerceptionSnapshot};
use serde::{Deserialize, Serialize};

use crate::rules::RuleKind;
use crate::state::{DrivingState, RiskColor, RiskLevel};

/// Which rule fired and the evidence it looked at. Advisory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDetail {
    /// Rule that selected the state
    pub rule: RuleKind,

    /// Short description of the firing condition
    pub trigger: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arousal: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_au_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub au_mean_confidence: Option<f64>,

    /// Active units among those the rule inspects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_aus: Option<Vec<ActionUnit>>,
}

impl TriggerDetail {
    /// Detail with no evidence attached
    pub fn new(rule: RuleKind, trigger: impl Into<String>) -> Self {
        Self {
            rule,
            trigger: trigger.into(),
            valence: None,
            arousal: None,
            emotion: None,
            active_au_count: None,
            au_mean_confidence: None,
            key_aus: None,
        }
    }
}

/// Fused driving state verdict for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingStateVerdict {
    pub state_code: DrivingState,

    /// Within `state_code.confidence_range()`
    pub confidence: f64,

    pub risk_level: RiskLevel,
    pub risk_color: RiskColor,
    pub display_label: String,
    pub recommendation: String,
    pub trigger_detail: TriggerDetail,
}

impl DrivingStateVerdict {
    /// Whether the verdict calls for driver intervention
    pub fn requires_intervention(&self) -> bool {
        self.risk_level >= RiskLevel::High
    }

    /// Whether the default fallback produced the verdict
    pub fn is_default(&self) -> bool {
        self.trigger_detail.rule == RuleKind::Default
    }
}

/// Flattened record the request gateway returns to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub emotion: String,
    pub emotion_confidence: f64,
    pub valence: f64,
    pub arousal: f64,
    pub active_aus: Vec<ActionUnit>,
    pub driving_state: String,
    pub driving_state_confidence: f64,
    pub risk_level: RiskLevel,
    pub risk_color: RiskColor,
    pub recommendation: String,
    pub details: TriggerDetail,
}

impl DetectionResponse {
    /// Combine the perception snapshot with its verdict
    pub fn compose(snapshot: &PerceptionSnapshot, verdict: &DrivingStateVerdict) -> Self {
        Self {
            emotion: snapshot.emotion.predicted_emotion.clone(),
            emotion_confidence: snapshot.emotion.confidence,
            valence: snapshot.valence_arousal.valence,
            arousal: snapshot.valence_arousal.arousal,
            active_aus: snapshot.action_units.active().collect(),
            driving_state: verdict.display_label.clone(),
            driving_state_confidence: verdict.confidence,
            risk_level: verdict.risk_level,
            risk_color: verdict.risk_color,
            recommendation: verdict.recommendation.clone(),
            details: verdict.trigger_detail.clone(),
        }
    }
}
