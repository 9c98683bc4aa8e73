//! Analysis run context.

use serde::{Deserialize, Serialize};

/// The analysis run a measurement is taken for.
///
/// Providers only use it to give their logs context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRun {
    /// Name of the analysis run.
    pub name: String,
    /// Namespace the analysis run lives in.
    #[serde(default)]
    pub namespace: String,
}

impl AnalysisRun {
    /// Creates a run context.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}
