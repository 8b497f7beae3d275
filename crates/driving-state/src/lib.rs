//! Driving State Fusion Engine
//!
//! Fuses three perception modalities of the driver's face into one
//! driving state verdict:
//! - Valence/arousal (continuous affect)
//! - Categorical emotion (FER)
//! - Facial action units (AU)
//!
//! Stages run strictly forward: input adapter, rule cascade, confidence
//! scorer, output composer. The engine is a pure function of its input.

pub mod confidence;
pub mod config;
pub mod engine;
pub mod rules;
pub mod state;
pub mod telemetry;
pub mod verdict;

pub use config::{EngineConfig, Locale};
pub use engine::DrivingStateEngine;
pub use rules::{Rule, RuleKind, CASCADE};
pub use state::{ConfidenceRange, DrivingState, RiskColor, RiskLevel};
pub use telemetry::init_logging;
pub use verdict::{DetectionResponse, DrivingStateVerdict, TriggerDetail};

pub use perception::{PerceptionSnapshot, ValidationError};

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid perception snapshot: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
