//! The web metric provider.
//!
//! One [`run`](Provider::run) is one GET request: build it from the metric,
//! send it, extract the value from the JSON body, then classify it. Every
//! failure along the way becomes an Error-phase measurement with no finish
//! time.

use super::client::{HttpClient, ProbeRequest, ReqwestClient};
use super::{ProbeError, Provider, ProviderError};
use crate::classify::classify;
use crate::condition::{ConditionEvaluator, ExpressionEvaluator};
use crate::extract::JsonPathExtractor;
use crate::models::{AnalysisRun, Measurement, MetricSpec, Phase, WebMetric};
use crate::value::ExtractedValue;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Provider type identifier.
pub const PROVIDER_TYPE: &str = "WebMetric";

/// Fetches a JSON document and classifies one value from it.
///
/// Holds only immutable state, so a single provider can serve concurrent runs.
#[derive(Clone)]
pub struct WebMetricProvider {
    client: Arc<dyn HttpClient>,
    extractor: Arc<JsonPathExtractor>,
    evaluator: Arc<dyn ConditionEvaluator>,
}

impl WebMetricProvider {
    /// Creates a provider for `web` with a `reqwest` client and the built-in
    /// expression evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSONPath expression does not compile or the
    /// HTTP client cannot be built.
    pub fn new(web: &WebMetric) -> Result<Self, ProviderError> {
        let client = ReqwestClient::new(web.timeout())?;
        Self::with_client(web, Arc::new(client))
    }

    /// Creates a provider that sends requests through `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSONPath expression does not compile.
    pub fn with_client(web: &WebMetric, client: Arc<dyn HttpClient>) -> Result<Self, ProviderError> {
        let extractor = JsonPathExtractor::compile(&web.json_path)?;

        Ok(Self {
            client,
            extractor: Arc::new(extractor),
            evaluator: Arc::new(ExpressionEvaluator),
        })
    }

    /// Replaces the condition evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ConditionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The compiled JSONPath expression.
    #[must_use]
    pub fn json_path(&self) -> &str {
        self.extractor.expression()
    }

    /// Sends the request and extracts the raw value.
    async fn fetch(&self, web: &WebMetric) -> Result<String, ProbeError> {
        let request = build_request(web)?;
        let response = self.client.send(request).await?;

        debug!(
            url = %web.url,
            status = response.status,
            "Web metric response received"
        );

        if !response.is_success() {
            return Err(ProbeError::UnexpectedStatus(response.status));
        }

        let raw = self.extractor.extract(&response.body)?;

        // A 2xx other than 200 is rejected only after a successful extraction
        if response.status != 200 {
            return Err(ProbeError::NonOkStatus(response.status));
        }

        Ok(raw)
    }
}

impl std::fmt::Debug for WebMetricProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebMetricProvider")
            .field("json_path", &self.extractor.expression())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for WebMetricProvider {
    fn provider_type(&self) -> &'static str {
        PROVIDER_TYPE
    }

    async fn run(&self, run: &AnalysisRun, metric: &MetricSpec) -> Measurement {
        let started_at = Utc::now();

        let Some(web) = metric.web() else {
            return Measurement::error(started_at, "metric has no web provider configuration");
        };

        let raw = match self.fetch(web).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    analysis = %run.name,
                    metric = %metric.name,
                    url = %web.url,
                    error = %err,
                    "Web metric measurement failed"
                );
                return Measurement::error(started_at, err.to_string());
            }
        };

        let extracted = ExtractedValue::new(raw);
        let phase = classify(
            extracted.value(),
            &metric.success_condition,
            &metric.failure_condition,
            self.evaluator.as_ref(),
        );

        match phase {
            Ok(phase) => {
                debug!(
                    metric = %metric.name,
                    value = %extracted,
                    kind = %extracted.kind(),
                    phase = %phase,
                    "Web metric measurement classified"
                );
                Measurement::completed(started_at, extracted.into_raw(), phase)
            }
            Err(err) => {
                warn!(
                    metric = %metric.name,
                    value = %extracted,
                    error = %err,
                    "Condition evaluation failed"
                );
                Measurement::completed(started_at, extracted.into_raw(), Phase::Error)
                    .with_message(err.to_string())
            }
        }
    }

    async fn resume(
        &self,
        _run: &AnalysisRun,
        metric: &MetricSpec,
        measurement: Measurement,
    ) -> Measurement {
        warn!(metric = %metric.name, "WebMetric provider should not execute the Resume method");
        measurement
    }

    async fn terminate(
        &self,
        _run: &AnalysisRun,
        metric: &MetricSpec,
        measurement: Measurement,
    ) -> Measurement {
        warn!(metric = %metric.name, "WebMetric provider should not execute the Terminate method");
        measurement
    }

    async fn garbage_collect(
        &self,
        _run: &AnalysisRun,
        _metric: &MetricSpec,
        _limit: usize,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Builds the GET request for a metric.
///
/// Headers are set in order, so a repeated key keeps the last value.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or a header is not valid HTTP.
pub fn build_request(web: &WebMetric) -> Result<ProbeRequest, ProbeError> {
    let url = Url::parse(&web.url).map_err(|source| ProbeError::InvalidUrl {
        url: web.url.clone(),
        source,
    })?;

    let mut headers = HeaderMap::with_capacity(web.headers.len());
    for header in &web.headers {
        let name = HeaderName::from_bytes(header.key.as_bytes()).map_err(|e| {
            ProbeError::InvalidHeader {
                key: header.key.clone(),
                reason: e.to_string(),
            }
        })?;
        // Opaque bytes are sent as configured; only control characters are rejected
        let value = HeaderValue::from_bytes(header.value.as_bytes()).map_err(|e| {
            ProbeError::InvalidHeader {
                key: header.key.clone(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(name, value);
    }

    Ok(ProbeRequest { url, headers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionError;
    use crate::provider::client::RawResponse;
    use crate::provider::TransportError;
    use crate::value::PrimitiveValue;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Client double that answers every request with a canned result.
    struct StubClient {
        response: Result<RawResponse, String>,
        requests: Mutex<Vec<ProbeRequest>>,
    }

    impl StubClient {
        fn ok(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(RawResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn send(&self, request: ProbeRequest) -> Result<RawResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.response.clone().map_err(TransportError::Other)
        }
    }

    fn metric(json_path: &str) -> MetricSpec {
        MetricSpec::new("test-metric", WebMetric::new("http://metrics.local/value", json_path))
    }

    fn provider(metric: &MetricSpec, client: Arc<StubClient>) -> WebMetricProvider {
        WebMetricProvider::with_client(metric.web().unwrap(), client).unwrap()
    }

    async fn measure(metric: &MetricSpec, client: Arc<StubClient>) -> Measurement {
        provider(metric, client)
            .run(&AnalysisRun::default(), metric)
            .await
    }

    #[test]
    fn test_provider_type() {
        let metric = metric("$.count");
        let provider = provider(&metric, StubClient::ok(200, "{}"));
        assert_eq!(provider.provider_type(), "WebMetric");
    }

    #[test]
    fn test_invalid_json_path_fails_construction() {
        let web = WebMetric::new("http://metrics.local", "$.[");
        let result = WebMetricProvider::with_client(&web, StubClient::ok(200, "{}"));
        assert!(matches!(result, Err(ProviderError::JsonPath(_))));
    }

    #[test]
    fn test_build_request_headers_last_wins() {
        let web = WebMetric::new("http://metrics.local/value", "$.count")
            .with_header("Authorization", "Bearer first")
            .with_header("X-Team", "canary")
            .with_header("authorization", "Bearer second");

        let request = build_request(&web).unwrap();

        assert_eq!(request.url.as_str(), "http://metrics.local/value");
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers["authorization"], "Bearer second");
        assert_eq!(request.headers["x-team"], "canary");
    }

    #[test]
    fn test_build_request_invalid_url() {
        let web = WebMetric::new("not a url", "$.count");
        let err = build_request(&web).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidUrl { .. }));
        assert!(err.to_string().starts_with("invalid URL 'not a url'"));
    }

    #[test]
    fn test_build_request_invalid_header() {
        let web = WebMetric::new("http://metrics.local", "$.count").with_header("bad header", "x");
        let err = build_request(&web).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidHeader { ref key, .. } if key == "bad header"));
    }

    #[test]
    fn test_build_request_accepts_non_ascii_value() {
        let web = WebMetric::new("http://metrics.local", "$.count").with_header("X-Team", "équipe");
        let request = build_request(&web).unwrap();
        assert_eq!(request.headers["x-team"].as_bytes(), "équipe".as_bytes());
    }

    #[test]
    fn test_build_request_rejects_line_break_in_value() {
        let web =
            WebMetric::new("http://metrics.local", "$.count").with_header("X-Team", "a\r\nX-Evil: 1");
        let err = build_request(&web).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidHeader { ref key, .. } if key == "X-Team"));
    }

    #[test]
    fn test_provider_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebMetricProvider>();
        assert_send_sync::<Box<dyn Provider>>();
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_one_provider() {
        let client = StubClient::ok(200, r#"{"count": 7}"#);
        let metric = metric("$.count").with_success_condition("result >= 5");
        let provider = Arc::new(provider(&metric, client.clone()));

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let provider = Arc::clone(&provider);
                let metric = metric.clone();
                tokio::spawn(async move {
                    let run = AnalysisRun::new(format!("run-{i}"), "default");
                    provider.run(&run, &metric).await
                })
            })
            .collect();

        for handle in handles {
            let measurement = handle.await.unwrap();
            assert_eq!(measurement.phase, Phase::Successful);
            assert_eq!(measurement.value, "7");
        }
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn test_run_success() {
        let metric = metric("$.count").with_success_condition("result >= 5");
        let measurement = measure(&metric, StubClient::ok(200, r#"{"count": 7}"#)).await;

        assert_eq!(measurement.phase, Phase::Successful);
        assert_eq!(measurement.value, "7");
        assert!(measurement.is_finished());
        assert!(measurement.message.is_none());
    }

    #[tokio::test]
    async fn test_run_no_conditions_is_successful() {
        let metric = metric("$.status");
        let measurement = measure(&metric, StubClient::ok(200, r#"{"status": "down"}"#)).await;

        assert_eq!(measurement.phase, Phase::Successful);
        assert_eq!(measurement.value, "down");
    }

    #[tokio::test]
    async fn test_run_failed_and_inconclusive() {
        let metric = metric("$.rate")
            .with_success_condition("result < 0.05")
            .with_failure_condition("result > 0.2");

        let failed = measure(&metric, StubClient::ok(200, r#"{"rate": 0.5}"#)).await;
        assert_eq!(failed.phase, Phase::Failed);

        let inconclusive = measure(&metric, StubClient::ok(200, r#"{"rate": 0.1}"#)).await;
        assert_eq!(inconclusive.phase, Phase::Inconclusive);
        assert_eq!(inconclusive.value, "0.1");
    }

    #[tokio::test]
    async fn test_run_bad_status_short_circuits() {
        let metric = metric("$.count");
        let measurement = measure(&metric, StubClient::ok(503, r#"{"count": 7}"#)).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert!(!measurement.is_finished());
        assert!(measurement.value.is_empty());
        assert_eq!(
            measurement.message.as_deref(),
            Some("received non-2xx response code: 503")
        );
    }

    #[tokio::test]
    async fn test_run_non_200_success_status_is_error() {
        let metric = metric("$.count");
        let measurement = measure(&metric, StubClient::ok(202, r#"{"count": 7}"#)).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert!(!measurement.is_finished());
        assert_eq!(
            measurement.message.as_deref(),
            Some("received non-200 response code: 202")
        );
    }

    #[tokio::test]
    async fn test_run_extract_error_wins_over_non_200() {
        let metric = metric("$.count");
        let measurement = measure(&metric, StubClient::ok(204, "")).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert_eq!(
            measurement.message.as_deref(),
            Some("Received no bytes in response")
        );
    }

    #[tokio::test]
    async fn test_run_transport_error() {
        let client = StubClient::failing("connection refused");
        let metric = metric("$.count");
        let measurement = measure(&metric, client.clone()).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert!(!measurement.is_finished());
        assert_eq!(measurement.message.as_deref(), Some("connection refused"));
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_run_invalid_url_sends_nothing() {
        let client = StubClient::ok(200, r#"{"count": 7}"#);
        let metric = MetricSpec::new("bad-url", WebMetric::new("::not-a-url", "$.count"));
        let measurement = measure(&metric, client.clone()).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_run_path_not_found() {
        let metric = metric("$.missing");
        let measurement = measure(&metric, StubClient::ok(200, r#"{"count": 7}"#)).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert_eq!(
            measurement.message.as_deref(),
            Some("Could not find JSONPath $.missing in body")
        );
    }

    #[tokio::test]
    async fn test_run_condition_error_keeps_value() {
        let metric = metric("$.status").with_success_condition("result > 5");
        let measurement = measure(&metric, StubClient::ok(200, r#"{"status": "ok"}"#)).await;

        assert_eq!(measurement.phase, Phase::Error);
        assert_eq!(measurement.value, "ok");
        assert!(measurement.is_finished());
        assert!(measurement
            .message
            .as_deref()
            .unwrap()
            .starts_with("Type mismatch"));
    }

    #[tokio::test]
    async fn test_run_with_injected_evaluator() {
        let metric = metric("$.count").with_success_condition("anything");
        let evaluator = |value: &PrimitiveValue, _: &str| -> Result<bool, ConditionError> {
            Ok(*value == PrimitiveValue::Int(7))
        };

        let provider = provider(&metric, StubClient::ok(200, r#"{"count": 7}"#))
            .with_evaluator(Arc::new(evaluator));
        let measurement = provider.run(&AnalysisRun::default(), &metric).await;

        assert_eq!(measurement.phase, Phase::Successful);
    }

    #[tokio::test]
    async fn test_lifecycle_hooks_pass_through() {
        let client = StubClient::ok(200, "{}");
        let metric = metric("$.count");
        let provider = provider(&metric, client.clone());
        let run = AnalysisRun::new("canary-analysis", "default");
        let measurement = Measurement::completed(Utc::now(), "7", Phase::Inconclusive);

        let resumed = provider.resume(&run, &metric, measurement.clone()).await;
        assert_eq!(resumed, measurement);

        let terminated = provider.terminate(&run, &metric, measurement.clone()).await;
        assert_eq!(terminated, measurement);

        assert!(provider.garbage_collect(&run, &metric, 10).await.is_ok());
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_debug_output() {
        let metric = metric("$.count");
        let provider = provider(&metric, StubClient::ok(200, "{}"));
        let debug = format!("{provider:?}");
        assert!(debug.contains("WebMetricProvider"));
        assert!(debug.contains("$.count"));
    }

    #[test]
    fn test_default_client_uses_metric_timeout() {
        let web = WebMetric::new("http://metrics.local", "$.count").with_timeout_seconds(0);
        assert_eq!(web.timeout(), Duration::from_secs(10));
        assert!(WebMetricProvider::new(&web).is_ok());
    }
}
