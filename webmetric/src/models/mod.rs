//! Data models for the web metric provider.
//!
//! This module contains metric definitions, the analysis run context and the
//! measurement a provider returns.

pub mod analysis;
pub mod measurement;
pub mod metric;

pub use analysis::AnalysisRun;
pub use measurement::{Measurement, Phase};
pub use metric::{
    MetricSpec, ProviderKind, ProviderSpec, WebMetric, WebMetricHeader, DEFAULT_TIMEOUT_SECS,
};
