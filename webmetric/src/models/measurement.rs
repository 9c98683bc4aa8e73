//! Measurement data model.
//!
//! A `Measurement` is the result of one provider call: when it started, when
//! (and whether) it finished, the extracted value and its classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal classification of a single measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The value satisfied the success condition.
    Successful,
    /// The value met the failure condition.
    Failed,
    /// Neither condition decided the measurement.
    Inconclusive,
    /// The measurement could not be taken or evaluated.
    Error,
}

impl Phase {
    /// Returns true for [`Phase::Error`].
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Successful => write!(f, "Successful"),
            Self::Failed => write!(f, "Failed"),
            Self::Inconclusive => write!(f, "Inconclusive"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// The result of one measurement tick.
///
/// # Example
///
/// ```
/// use webmetric::chrono::Utc;
/// use webmetric::models::{Measurement, Phase};
///
/// let measurement = Measurement::completed(Utc::now(), "7", Phase::Successful);
/// assert!(measurement.is_finished());
///
/// let failed = Measurement::error(Utc::now(), "connection refused");
/// assert_eq!(failed.phase, Phase::Error);
/// assert!(!failed.is_finished());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// The classification of this measurement.
    pub phase: Phase,

    /// Diagnostic message, set when something went wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the measurement started.
    pub started_at: DateTime<Utc>,

    /// When the measurement finished. Unset if it did not complete normally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// The extracted value as text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Measurement {
    /// Creates a measurement that completed with a classified value.
    ///
    /// The finish time is the current time.
    #[must_use]
    pub fn completed(started_at: DateTime<Utc>, value: impl Into<String>, phase: Phase) -> Self {
        Self {
            phase,
            message: None,
            started_at,
            finished_at: Some(Utc::now()),
            value: value.into(),
        }
    }

    /// Creates an error measurement that did not complete.
    ///
    /// The finish time stays unset.
    #[must_use]
    pub fn error(started_at: DateTime<Utc>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            phase: Phase::Error,
            message: (!message.is_empty()).then_some(message),
            started_at,
            finished_at: None,
            value: String::new(),
        }
    }

    /// Attaches a diagnostic message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns true if the measurement has a finish time.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
