//! Three-modality perception snapshot and its wire decoding

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::action_unit::{ActionUnit, ActionUnitReading, ActionUnitResult};
use crate::emotion::EmotionResult;
use crate::error::ValidationError;

/// Wire key of the valence/arousal section
pub const VALENCE_AROUSAL_KEY: &str = "Valence_Arousal";
/// Wire key of the FER section
pub const EMOTION_KEY: &str = "Emotion_Classification";
/// Wire key of the AU section
pub const ACTION_UNITS_KEY: &str = "AU_Recognition";

/// Continuous affect estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValenceArousal {
    /// Pleasantness, nominally -1..1
    pub valence: f64,
    /// Activation, nominally 0..1
    pub arousal: f64,
}

impl ValenceArousal {
    /// Estimate from raw model output, unclamped
    pub fn new(valence: f64, arousal: f64) -> Self {
        Self { valence, arousal }
    }
}

/// One frame of perception output. All three sections are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionSnapshot {
    #[serde(rename = "Valence_Arousal")]
    pub valence_arousal: ValenceArousal,

    #[serde(rename = "Emotion_Classification")]
    pub emotion: EmotionResult,

    #[serde(rename = "AU_Recognition")]
    pub action_units: ActionUnitResult,
}

impl PerceptionSnapshot {
    /// Snapshot from already typed sections
    pub fn new(
        valence_arousal: ValenceArousal,
        emotion: EmotionResult,
        action_units: ActionUnitResult,
    ) -> Self {
        Self {
            valence_arousal,
            emotion,
            action_units,
        }
    }

    /// Decode the perception service's JSON output
    pub fn from_json_str(input: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ValidationError::InvalidFormat(format!("snapshot is not valid JSON: {}", e)))?;
        Self::from_json(&value)
    }

    /// Decode an already parsed JSON document.
    ///
    /// Reports the first structural problem found: a missing section, a
    /// missing key, a value of the wrong JSON type, or an AU code outside
    /// the fixed set. Numeric ranges are not checked.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let root = value
            .as_object()
            .ok_or_else(|| ValidationError::InvalidFormat("snapshot must be a JSON object".into()))?;

        let va = section(root, VALENCE_AROUSAL_KEY)?;
        let fer = section(root, EMOTION_KEY)?;
        let au = section(root, ACTION_UNITS_KEY)?;

        Ok(Self {
            valence_arousal: decode_valence_arousal(va)?,
            emotion: decode_emotion(fer)?,
            action_units: decode_action_units(au)?,
        })
    }
}

fn section<'a>(
    root: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    match root.get(key) {
        None | Some(Value::Null) => Err(ValidationError::MissingSection(key)),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ValidationError::InvalidFormat(format!("{} must be an object", key))),
    }
}

fn field<'a>(
    map: &'a Map<String, Value>,
    section: &'static str,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField { section, field }),
        Some(value) => Ok(value),
    }
}

fn number(value: &Value, path: &str) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .ok_or_else(|| ValidationError::InvalidFormat(format!("{} must be a number", path)))
}

fn count(value: &Value, path: &str) -> Result<usize, ValidationError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ValidationError::InvalidFormat(format!("{} must be a non-negative integer", path)))
}

/// Optional key: absent or null is `None`, anything else must decode
fn optional<T>(
    map: &Map<String, Value>,
    key: &str,
    decode: impl FnOnce(&Value) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode(value).map(Some),
    }
}

fn decode_valence_arousal(map: &Map<String, Value>) -> Result<ValenceArousal, ValidationError> {
    let valence = number(field(map, VALENCE_AROUSAL_KEY, "valence")?, "Valence_Arousal.valence")?;
    let arousal = number(field(map, VALENCE_AROUSAL_KEY, "arousal")?, "Valence_Arousal.arousal")?;
    Ok(ValenceArousal { valence, arousal })
}

fn decode_emotion(map: &Map<String, Value>) -> Result<EmotionResult, ValidationError> {
    let predicted_emotion = field(map, EMOTION_KEY, "predicted_emotion")?
        .as_str()
        .ok_or_else(|| {
            ValidationError::InvalidFormat("Emotion_Classification.predicted_emotion must be a string".into())
        })?
        .to_string();
    let confidence = number(
        field(map, EMOTION_KEY, "confidence")?,
        "Emotion_Classification.confidence",
    )?;

    let probabilities = optional(map, "probabilities", |value| {
        value
            .as_object()
            .ok_or_else(|| {
                ValidationError::InvalidFormat("Emotion_Classification.probabilities must be an object".into())
            })?
            .iter()
            .map(|(label, p)| {
                number(p, &format!("Emotion_Classification.probabilities.{}", label))
                    .map(|p| (label.clone(), p))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
    })?
    .unwrap_or_default();

    let emotion_index = optional(map, "emotion_index", |value| {
        count(value, "Emotion_Classification.emotion_index")
    })?;

    Ok(EmotionResult {
        predicted_emotion,
        confidence,
        probabilities,
        emotion_index,
    })
}

fn decode_action_units(map: &Map<String, Value>) -> Result<ActionUnitResult, ValidationError> {
    let details = field(map, ACTION_UNITS_KEY, "detailed_results")?
        .as_object()
        .ok_or_else(|| {
            ValidationError::InvalidFormat("AU_Recognition.detailed_results must be an object".into())
        })?;

    let mut detailed_results = BTreeMap::new();
    for (code, entry) in details {
        let au = ActionUnit::from_code(code)
            .ok_or_else(|| ValidationError::UnknownActionUnit(code.clone()))?;
        let entry = entry.as_object().ok_or_else(|| {
            ValidationError::InvalidFormat(format!("AU_Recognition.detailed_results.{} must be an object", code))
        })?;

        let present = field(entry, ACTION_UNITS_KEY, "present")?
            .as_bool()
            .ok_or_else(|| ValidationError::InvalidFormat(format!("{}.present must be a boolean", code)))?;
        let confidence = number(field(entry, ACTION_UNITS_KEY, "confidence")?, &format!("{}.confidence", code))?;

        detailed_results.insert(au, ActionUnitReading { present, confidence });
    }

    let active_aus = optional(map, "active_AUs", |value| {
        value
            .as_array()
            .ok_or_else(|| ValidationError::InvalidFormat("AU_Recognition.active_AUs must be an array".into()))?
            .iter()
            .map(|code| {
                code.as_str().map(str::to_string).ok_or_else(|| {
                    ValidationError::InvalidFormat("AU_Recognition.active_AUs must hold strings".into())
                })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    let total_active = optional(map, "total_active", |value| count(value, "AU_Recognition.total_active"))?;

    Ok(ActionUnitResult {
        detailed_results,
        active_aus,
        total_active,
    })
}
