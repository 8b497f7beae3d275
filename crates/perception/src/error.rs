//! Validation Error Types

use thiserror::Error;

use crate::action_unit::ActionUnit;

/// Errors raised while decoding or adapting a perception snapshot
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A whole modality section is absent
    #[error("Missing modality section: {0}")]
    MissingSection(&'static str),

    /// A required key is absent from a modality section
    #[error("Missing required field: {section}.{field}")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// An action unit of the fixed set has no entry
    #[error("Missing action unit entry: {0}")]
    MissingActionUnit(ActionUnit),

    /// An action unit code outside the fixed set
    #[error("Unknown action unit code: {0}")]
    UnknownActionUnit(String),

    /// NaN or infinite value where a number is required
    #[error("{field} is not a finite number")]
    NonFiniteValue { field: String },
}
