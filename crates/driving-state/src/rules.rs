//! Prioritized rule cascade
//!
//! Rules are evaluated top to bottom and the first match wins. Order is
//! safety policy: drowsiness and anger must win over milder states when
//! several guards hold. Thresholds are empirically tuned policy constants;
//! overlapping bands are resolved by order alone.

use perception::{ActionUnit, Emotion, EvidenceFrame};
use serde::{Deserialize, Serialize};

use crate::confidence;
use crate::config::Locale;
use crate::state::DrivingState;
use crate::verdict::TriggerDetail;

/// Identifies the rule behind a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Drowsy,
    Angry,
    Stressed,
    Alert,
    Distracted,
    Surprised,
    Sad,
    Relaxed,
    /// Nothing matched
    Default,
}

impl RuleKind {
    /// Short description of the firing condition
    pub fn trigger(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                RuleKind::Drowsy => "low arousal, low valence, inactive action units",
                RuleKind::Angry => "low valence, high arousal, angry expression",
                RuleKind::Stressed => "high arousal, low valence, fear or disgust expression",
                RuleKind::Alert => "high arousal, surprised or composed expression",
                RuleKind::Distracted => "few active action units, moderate arousal, flat expression",
                RuleKind::Surprised => "surprise expression, high arousal",
                RuleKind::Sad => "sad expression, low to moderate arousal",
                RuleKind::Relaxed => {
                    "moderate valence and arousal, neutral or pleasant expression, moderate AU activity"
                }
                RuleKind::Default => "default safe state",
            },
            Locale::Zh => match self {
                RuleKind::Drowsy => "低覆盖度+低觉醒度+AU不活跃",
                RuleKind::Angry => "低价值+高觉醒+愤怒表情",
                RuleKind::Stressed => "高觉醒+低价值+恐惧/厌恶表情",
                RuleKind::Alert => "高觉醒+惊讶/适中表情",
                RuleKind::Distracted => "低AU活跃+中等觉醒+表情呆板",
                RuleKind::Surprised => "惊讶表情+高觉醒",
                RuleKind::Sad => "伤心表情+低-中觉醒",
                RuleKind::Relaxed => "适中VA+中性/愉快表情+AU活跃适中",
                RuleKind::Default => "默认安全状态",
            },
        }
    }
}

const ANGRY_KEY_AUS: [ActionUnit; 3] = [ActionUnit::Au4, ActionUnit::Au7, ActionUnit::Au23];
const STRESSED_KEY_AUS: [ActionUnit; 3] = [ActionUnit::Au4, ActionUnit::Au5, ActionUnit::Au17];
const BROW_RAISE_AUS: [ActionUnit; 3] = [ActionUnit::Au1, ActionUnit::Au2, ActionUnit::Au5];

/// One cascade entry: guard, scorer, and trigger evidence
pub struct Rule {
    pub kind: RuleKind,
    pub state: DrivingState,
    predicate: fn(&EvidenceFrame) -> bool,
    scorer: fn(&EvidenceFrame) -> f64,
    evidence: fn(&EvidenceFrame, &mut TriggerDetail),
}

impl Rule {
    /// Whether the guard holds
    pub fn matches(&self, frame: &EvidenceFrame) -> bool {
        (self.predicate)(frame)
    }

    /// Clamped confidence for this rule's state
    pub fn score(&self, frame: &EvidenceFrame) -> f64 {
        (self.scorer)(frame)
    }

    /// Firing condition in `locale`
    pub fn trigger(&self, locale: Locale) -> &'static str {
        self.kind.trigger(locale)
    }

    /// Diagnostic record of the evidence this rule inspects
    pub fn trigger_detail(&self, frame: &EvidenceFrame, locale: Locale) -> TriggerDetail {
        let mut detail = TriggerDetail::new(self.kind, self.trigger(locale));
        (self.evidence)(frame, &mut detail);
        detail
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .finish()
    }
}

/// Cascade in priority order
pub static CASCADE: [Rule; 8] = [
    Rule {
        kind: RuleKind::Drowsy,
        state: DrivingState::Drowsy,
        predicate: is_drowsy,
        scorer: confidence::drowsy,
        evidence: |f, d| {
            d.arousal = Some(f.arousal);
            d.active_au_count = Some(f.au_count);
        },
    },
    Rule {
        kind: RuleKind::Angry,
        state: DrivingState::Angry,
        predicate: is_angry,
        scorer: confidence::angry,
        evidence: |f, d| {
            d.valence = Some(f.valence);
            d.arousal = Some(f.arousal);
            d.key_aus = Some(f.active_among(&ANGRY_KEY_AUS));
        },
    },
    Rule {
        kind: RuleKind::Stressed,
        state: DrivingState::Stressed,
        predicate: is_stressed,
        scorer: confidence::stressed,
        evidence: |f, d| {
            d.valence = Some(f.valence);
            d.arousal = Some(f.arousal);
            d.key_aus = Some(f.active_among(&STRESSED_KEY_AUS));
        },
    },
    Rule {
        kind: RuleKind::Alert,
        state: DrivingState::Alert,
        predicate: is_alert,
        scorer: confidence::alert,
        evidence: |f, d| {
            d.arousal = Some(f.arousal);
            d.key_aus = Some(f.active_among(&BROW_RAISE_AUS));
        },
    },
    Rule {
        kind: RuleKind::Distracted,
        state: DrivingState::Distracted,
        predicate: is_distracted,
        scorer: confidence::distracted,
        evidence: |f, d| {
            d.active_au_count = Some(f.au_count);
            d.au_mean_confidence = Some(f.au_mean);
        },
    },
    Rule {
        kind: RuleKind::Surprised,
        state: DrivingState::Surprised,
        predicate: is_surprised,
        scorer: confidence::surprised,
        evidence: |f, d| {
            d.arousal = Some(f.arousal);
        },
    },
    Rule {
        kind: RuleKind::Sad,
        state: DrivingState::Sad,
        predicate: is_sad,
        scorer: confidence::sad,
        evidence: |f, d| {
            d.emotion = Some(f.emotion_label.clone());
            d.arousal = Some(f.arousal);
        },
    },
    Rule {
        kind: RuleKind::Relaxed,
        state: DrivingState::Relaxed,
        predicate: is_relaxed,
        scorer: confidence::relaxed,
        evidence: |f, d| {
            d.valence = Some(f.valence);
            d.arousal = Some(f.arousal);
        },
    },
];

/// Outcome of running the cascade
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub state: DrivingState,
    pub confidence: f64,
    pub trigger_detail: TriggerDetail,
}

/// Run the cascade; the first matching rule decides. Total: falls back to
/// relaxed at [`confidence::DEFAULT_CONFIDENCE`] when nothing matches.
/// `locale` only selects the trigger text.
pub fn evaluate(frame: &EvidenceFrame, locale: Locale) -> Selection {
    match CASCADE.iter().find(|rule| rule.matches(frame)) {
        Some(rule) => Selection {
            state: rule.state,
            confidence: rule.score(frame),
            trigger_detail: rule.trigger_detail(frame, locale),
        },
        None => Selection {
            state: DrivingState::Relaxed,
            confidence: confidence::DEFAULT_CONFIDENCE,
            trigger_detail: TriggerDetail::new(RuleKind::Default, RuleKind::Default.trigger(locale)),
        },
    }
}

/// Very low arousal with low valence and few active units, or a flat face at arousal below 0.2
pub fn is_drowsy(f: &EvidenceFrame) -> bool {
    let low_arousal = f.arousal < 0.25;
    let low_valence = f.valence < 0.3;
    let inactive = f.au_count <= 3;
    let flat_expression = f.emotion_in(&[Emotion::Sad, Emotion::Neutral]);

    (low_arousal && low_valence && inactive) || (f.arousal < 0.2 && flat_expression)
}

/// Angry face with high arousal, or low valence and high arousal with AU4/AU7
pub fn is_angry(f: &EvidenceFrame) -> bool {
    let angry_face = f.emotion_is(Emotion::Angry);
    let va_match = f.valence < 0.2 && f.arousal > 0.6;
    let brow_or_lid = f.any_active(&[ActionUnit::Au4, ActionUnit::Au7]);

    (angry_face && f.arousal > 0.65) || (va_match && brow_or_lid) || (angry_face && va_match)
}

/// High arousal and low valence with a tense face or AU4
pub fn is_stressed(f: &EvidenceFrame) -> bool {
    let va_match = f.arousal > 0.6 && f.valence < 0.3;
    let tense_face = f.emotion_in(&[Emotion::Fear, Emotion::Disgust, Emotion::Angry]);

    va_match && (tense_face || f.is_active(ActionUnit::Au4))
}

/// High arousal with an engaged face or a raised brow
pub fn is_alert(f: &EvidenceFrame) -> bool {
    let engaged_face = f.emotion_in(&[Emotion::Surprise, Emotion::Happy, Emotion::Neutral]);

    f.arousal > 0.65 && (engaged_face || f.any_active(&BROW_RAISE_AUS))
}

/// Few active units with a flat face, or moderate arousal and neutral valence
pub fn is_distracted(f: &EvidenceFrame) -> bool {
    let flat_expression = f.emotion_in(&[Emotion::Sad, Emotion::Neutral]);
    let moderate_arousal = f.arousal > 0.2 && f.arousal < 0.5;
    let neutral_valence = f.valence > -0.1 && f.valence < 0.2;

    (f.au_count <= 2 && flat_expression) || (moderate_arousal && neutral_valence && f.au_count <= 3)
}

/// Surprise face with high arousal
pub fn is_surprised(f: &EvidenceFrame) -> bool {
    f.emotion_is(Emotion::Surprise) && f.arousal > 0.65
}

/// Sad face below moderate arousal
pub fn is_sad(f: &EvidenceFrame) -> bool {
    f.emotion_is(Emotion::Sad) && f.arousal < 0.5
}

/// Pleasant face at moderate arousal with positive valence and 2 to 6 active units
pub fn is_relaxed(f: &EvidenceFrame) -> bool {
    let va_ok = (0.3..=0.7).contains(&f.arousal) && f.valence > 0.1;
    let pleasant_face = f.emotion_in(&[Emotion::Neutral, Emotion::Happy, Emotion::Surprise]);
    let moderate_activity = (2..=6).contains(&f.au_count);

    va_ok && pleasant_face && moderate_activity
}
