//! Metric providers.
//!
//! A host dispatches every measurement tick to a [`Provider`] picked by the
//! metric's provider kind. [`new_provider`] is that dispatch.

mod client;
mod error;
mod web;

pub use client::{HttpClient, ProbeRequest, RawResponse, ReqwestClient};
pub use error::{ProbeError, ProviderError, TransportError};
pub use web::{build_request, WebMetricProvider, PROVIDER_TYPE};

use crate::models::{AnalysisRun, Measurement, MetricSpec, ProviderSpec};
use async_trait::async_trait;
use tracing::debug;

/// The contract every metric provider satisfies.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Constant identifier for this provider kind.
    fn provider_type(&self) -> &'static str;

    /// Takes one measurement.
    ///
    /// Never fails: problems are reported as an Error-phase measurement.
    async fn run(&self, run: &AnalysisRun, metric: &MetricSpec) -> Measurement;

    /// Resumes a measurement left in progress.
    async fn resume(
        &self,
        run: &AnalysisRun,
        metric: &MetricSpec,
        measurement: Measurement,
    ) -> Measurement;

    /// Terminates a measurement left in progress.
    async fn terminate(
        &self,
        run: &AnalysisRun,
        metric: &MetricSpec,
        measurement: Measurement,
    ) -> Measurement;

    /// Cleans up measurements beyond `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if cleanup fails.
    async fn garbage_collect(
        &self,
        run: &AnalysisRun,
        metric: &MetricSpec,
        limit: usize,
    ) -> Result<(), ProviderError>;
}

/// Creates the provider for a metric based on its provider kind.
///
/// # Errors
///
/// Returns an error if the provider cannot be built, for example when the
/// JSONPath expression does not compile.
pub fn new_provider(metric: &MetricSpec) -> Result<Box<dyn Provider>, ProviderError> {
    debug!(metric = %metric.name, kind = %metric.provider.kind(), "Creating provider");

    match &metric.provider {
        ProviderSpec::Web(web) => Ok(Box::new(WebMetricProvider::new(web)?)),
    }
}
