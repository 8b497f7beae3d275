//! Driving states and their static presentation tables

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Locale;

/// Discrete driving state verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingState {
    Drowsy,
    Alert,
    Angry,
    Distracted,
    Stressed,
    Relaxed,
    Surprised,
    Sad,
}

/// Risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Medium,
    High,
    Critical,
}

/// Dashboard color for a risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Closed interval a state's confidence always falls in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceRange {
    pub floor: f64,
    pub ceiling: f64,
}

impl ConfidenceRange {
    const fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    /// Clamp a raw score into the range
    pub fn clamp(&self, score: f64) -> f64 {
        score.max(self.floor).min(self.ceiling)
    }

    /// Whether `value` lies in the closed interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.floor && value <= self.ceiling
    }
}

impl DrivingState {
    /// All states, in declaration order
    pub const ALL: [DrivingState; 8] = [
        DrivingState::Drowsy,
        DrivingState::Alert,
        DrivingState::Angry,
        DrivingState::Distracted,
        DrivingState::Stressed,
        DrivingState::Relaxed,
        DrivingState::Surprised,
        DrivingState::Sad,
    ];

    /// State code
    pub fn as_str(&self) -> &'static str {
        match self {
            DrivingState::Drowsy => "drowsy",
            DrivingState::Alert => "alert",
            DrivingState::Angry => "angry",
            DrivingState::Distracted => "distracted",
            DrivingState::Stressed => "stressed",
            DrivingState::Relaxed => "relaxed",
            DrivingState::Surprised => "surprised",
            DrivingState::Sad => "sad",
        }
    }

    /// Risk level and color
    pub fn risk(&self) -> (RiskLevel, RiskColor) {
        match self {
            DrivingState::Drowsy => (RiskLevel::Critical, RiskColor::Red),
            DrivingState::Alert => (RiskLevel::Safe, RiskColor::Green),
            DrivingState::Angry => (RiskLevel::High, RiskColor::Red),
            DrivingState::Distracted => (RiskLevel::Medium, RiskColor::Yellow),
            DrivingState::Stressed => (RiskLevel::High, RiskColor::Orange),
            DrivingState::Relaxed => (RiskLevel::Safe, RiskColor::Green),
            DrivingState::Surprised => (RiskLevel::Medium, RiskColor::Yellow),
            DrivingState::Sad => (RiskLevel::Medium, RiskColor::Yellow),
        }
    }

    /// Documented confidence interval.
    ///
    /// Surprised is derived from arousal and its rule only fires above 0.65,
    /// so its floor is 0.5 in practice. The default relaxed verdict (0.5)
    /// lies inside the relaxed interval.
    pub fn confidence_range(&self) -> ConfidenceRange {
        match self {
            DrivingState::Drowsy => ConfidenceRange::new(0.5, 0.95),
            DrivingState::Angry => ConfidenceRange::new(0.5, 0.95),
            DrivingState::Stressed => ConfidenceRange::new(0.5, 0.9),
            DrivingState::Alert => ConfidenceRange::new(0.5, 0.9),
            DrivingState::Distracted => ConfidenceRange::new(0.5, 0.85),
            DrivingState::Relaxed => ConfidenceRange::new(0.5, 0.9),
            DrivingState::Surprised => ConfidenceRange::new(0.5, 0.9),
            DrivingState::Sad => ConfidenceRange::new(0.7, 0.7),
        }
    }

    /// Human readable label
    pub fn display_label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                DrivingState::Drowsy => "Drowsy Driving",
                DrivingState::Alert => "Alert",
                DrivingState::Angry => "Angry Driving",
                DrivingState::Distracted => "Distracted",
                DrivingState::Stressed => "Stressed Driving",
                DrivingState::Relaxed => "Relaxed",
                DrivingState::Surprised => "Surprised, On Guard",
                DrivingState::Sad => "Low Mood",
            },
            Locale::Zh => match self {
                DrivingState::Drowsy => "疲劳驾驶",
                DrivingState::Alert => "警觉状态",
                DrivingState::Angry => "愤怒驾驶",
                DrivingState::Distracted => "分心状态",
                DrivingState::Stressed => "压力驾驶",
                DrivingState::Relaxed => "放松状态",
                DrivingState::Surprised => "惊讶警觉",
                DrivingState::Sad => "压抑状态",
            },
        }
    }

    /// Recommended driver action
    pub fn recommendation(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                DrivingState::Drowsy => "Pull over and rest immediately. Check whether you have slept enough.",
                DrivingState::Alert => "Keep it up and continue driving safely.",
                DrivingState::Angry => "Calm down, reduce speed, and avoid aggressive driving.",
                DrivingState::Distracted => "Focus on the road. Check for outside distractions.",
                DrivingState::Stressed => "Slow down and take a few deep breaths to release the pressure.",
                DrivingState::Relaxed => "Composed and calm, continue driving normally.",
                DrivingState::Surprised => "Drive carefully, something unexpected may be ahead.",
                DrivingState::Sad => "Consider resting to settle your mood before driving on.",
            },
            Locale::Zh => match self {
                DrivingState::Drowsy => "⚠️ 立即停车休息！检查是否充足睡眠。",
                DrivingState::Alert => "✓ 保持当前状态，继续安全驾驶。",
                DrivingState::Angry => "🔴 建议冷静，降低车速，避免激进驾驶。",
                DrivingState::Distracted => "⚠️ 集中注意力！检查是否有外界干扰。",
                DrivingState::Stressed => "🟡 放缓车速，做几个深呼吸放松压力。",
                DrivingState::Relaxed => "✓ 心态平和，可继续正常驾驶。",
                DrivingState::Surprised => "⚠️ 谨慎驾驶，可能发现突发情况。",
                DrivingState::Sad => "🟡 建议休息调整心情后再驾驶。",
            },
        }
    }
}

impl fmt::Display for DrivingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
