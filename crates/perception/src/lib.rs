//! Perception Snapshot Model
//!
//! Typed view of the perception service's three-modality output:
//! - Valence/arousal regression
//! - Categorical facial emotion recognition (FER)
//! - Multi-label facial action unit (AU) recognition
//!
//! Also provides wire decoding and the input adapter that reduces a
//! snapshot to the evidence consumed by the driving state rules.

mod action_unit;
mod adapter;
mod emotion;
mod error;
mod snapshot;

pub use action_unit::{ActionUnit, ActionUnitReading, ActionUnitResult};
pub use adapter::{EvidenceFrame, InputAdapter};
pub use emotion::{Emotion, EmotionResult};
pub use error::ValidationError;
pub use snapshot::{
    PerceptionSnapshot, ValenceArousal, ACTION_UNITS_KEY, EMOTION_KEY, VALENCE_AROUSAL_KEY,
};
