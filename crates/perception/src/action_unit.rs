//! Facial action units (FACS) and their per-unit readings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Action unit codes reported by the AU recognition model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionUnit {
    /// Inner brow raiser
    #[serde(rename = "AU1")]
    Au1,
    /// Outer brow raiser
    #[serde(rename = "AU2")]
    Au2,
    /// Brow lowerer
    #[serde(rename = "AU4")]
    Au4,
    /// Upper lid raiser
    #[serde(rename = "AU5")]
    Au5,
    /// Cheek raiser
    #[serde(rename = "AU6")]
    Au6,
    /// Lid tightener
    #[serde(rename = "AU7")]
    Au7,
    /// Nose wrinkler
    #[serde(rename = "AU9")]
    Au9,
    /// Lip corner puller
    #[serde(rename = "AU12")]
    Au12,
    /// Dimpler
    #[serde(rename = "AU14")]
    Au14,
    /// Lip corner depressor
    #[serde(rename = "AU15")]
    Au15,
    /// Chin raiser
    #[serde(rename = "AU17")]
    Au17,
    /// Lip stretcher
    #[serde(rename = "AU20")]
    Au20,
    /// Lip tightener
    #[serde(rename = "AU23")]
    Au23,
    /// Lip pressor
    #[serde(rename = "AU24")]
    Au24,
    /// Lips part
    #[serde(rename = "AU25")]
    Au25,
    /// Jaw drop
    #[serde(rename = "AU26")]
    Au26,
    /// Mouth stretch
    #[serde(rename = "AU27")]
    Au27,
}

impl ActionUnit {
    /// Every action unit, in the order the recognition model emits them
    pub const ALL: [ActionUnit; 17] = [
        ActionUnit::Au1,
        ActionUnit::Au2,
        ActionUnit::Au4,
        ActionUnit::Au5,
        ActionUnit::Au6,
        ActionUnit::Au7,
        ActionUnit::Au9,
        ActionUnit::Au12,
        ActionUnit::Au14,
        ActionUnit::Au15,
        ActionUnit::Au17,
        ActionUnit::Au20,
        ActionUnit::Au23,
        ActionUnit::Au24,
        ActionUnit::Au25,
        ActionUnit::Au26,
        ActionUnit::Au27,
    ];

    /// Wire code, e.g. `"AU4"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionUnit::Au1 => "AU1",
            ActionUnit::Au2 => "AU2",
            ActionUnit::Au4 => "AU4",
            ActionUnit::Au5 => "AU5",
            ActionUnit::Au6 => "AU6",
            ActionUnit::Au7 => "AU7",
            ActionUnit::Au9 => "AU9",
            ActionUnit::Au12 => "AU12",
            ActionUnit::Au14 => "AU14",
            ActionUnit::Au15 => "AU15",
            ActionUnit::Au17 => "AU17",
            ActionUnit::Au20 => "AU20",
            ActionUnit::Au23 => "AU23",
            ActionUnit::Au24 => "AU24",
            ActionUnit::Au25 => "AU25",
            ActionUnit::Au26 => "AU26",
            ActionUnit::Au27 => "AU27",
        }
    }

    /// Parse a wire code. Returns `None` for codes outside the fixed set.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|au| au.as_str() == code)
    }
}

impl fmt::Display for ActionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholded activation of a single action unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionUnitReading {
    /// Activation probability exceeded the service's threshold
    pub present: bool,
    /// Raw activation probability (0-1)
    pub confidence: f64,
}

impl ActionUnitReading {
    /// Reading with the service's `present` flag and raw probability
    pub fn new(present: bool, confidence: f64) -> Self {
        Self { present, confidence }
    }
}

/// Multi-label AU recognition output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionUnitResult {
    /// Per-unit readings keyed by code
    pub detailed_results: BTreeMap<ActionUnit, ActionUnitReading>,

    /// Active codes as listed by the perception service (informational)
    #[serde(rename = "active_AUs", default, skip_serializing_if = "Option::is_none")]
    pub active_aus: Option<Vec<String>>,

    /// Active count as reported by the perception service (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_active: Option<usize>,
}

impl ActionUnitResult {
    /// Build from readings, without the informational service fields
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = (ActionUnit, ActionUnitReading)>,
    {
        Self {
            detailed_results: readings.into_iter().collect(),
            active_aus: None,
            total_active: None,
        }
    }

    /// Build a full 17-unit result where only `active` units are present.
    ///
    /// Active units get `active_confidence`, the rest get `idle_confidence`.
    pub fn with_active(active: &[ActionUnit], active_confidence: f64, idle_confidence: f64) -> Self {
        Self::from_readings(ActionUnit::ALL.iter().map(|&au| {
            if active.contains(&au) {
                (au, ActionUnitReading::new(true, active_confidence))
            } else {
                (au, ActionUnitReading::new(false, idle_confidence))
            }
        }))
    }

    /// Get the reading for a unit
    pub fn reading(&self, au: ActionUnit) -> Option<&ActionUnitReading> {
        self.detailed_results.get(&au)
    }

    /// Codes whose `present` flag is set, in model order
    pub fn active(&self) -> impl Iterator<Item = ActionUnit> + '_ {
        self.detailed_results
            .iter()
            .filter(|(_, reading)| reading.present)
            .map(|(&au, _)| au)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for au in ActionUnit::ALL {
            assert_eq!(ActionUnit::from_code(au.as_str()), Some(au));
        }
        assert_eq!(ActionUnit::from_code("AU3"), None);
        assert_eq!(ActionUnit::from_code("au4"), None);
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        let json = serde_json::to_string(&ActionUnit::Au12).unwrap();
        assert_eq!(json, "\"AU12\"");
    }

    #[test]
    fn test_with_active_marks_only_listed_units() {
        let result = ActionUnitResult::with_active(&[ActionUnit::Au4, ActionUnit::Au7], 0.8, 0.1);

        assert_eq!(result.detailed_results.len(), 17);
        let active: Vec<_> = result.active().collect();
        assert_eq!(active, vec![ActionUnit::Au4, ActionUnit::Au7]);
        assert_eq!(result.reading(ActionUnit::Au4).unwrap().confidence, 0.8);
        assert_eq!(result.reading(ActionUnit::Au1).unwrap().confidence, 0.1);
    }
}
