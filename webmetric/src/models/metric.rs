//! Metric definition model.
//!
//! Defines the `MetricSpec` the host hands to a provider on every measurement
//! tick, and the provider-specific configuration it carries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request timeout used when a metric does not configure a positive one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The kind of provider a metric is measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Fetch a JSON document over HTTP and extract a value with JSONPath.
    Web,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
        }
    }
}

/// A single HTTP header sent with a web metric request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebMetricHeader {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
}

/// Configuration of the web metric provider.
///
/// # Example
///
/// ```
/// use webmetric::models::WebMetric;
///
/// let web = WebMetric::new("http://metrics.local/api/health", "$.data.ok")
///     .with_header("Authorization", "Bearer token")
///     .with_timeout_seconds(5);
///
/// assert_eq!(web.timeout().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMetric {
    /// The URL to send the GET request to.
    pub url: String,

    /// Headers attached to the request, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<WebMetricHeader>,

    /// Request timeout in seconds. Values `<= 0` fall back to the default.
    #[serde(default)]
    pub timeout_seconds: i64,

    /// JSONPath expression selecting the measured value.
    pub json_path: String,
}

impl WebMetric {
    /// Creates a web metric configuration with the default timeout and no headers.
    #[must_use]
    pub fn new(url: impl Into<String>, json_path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout_seconds: 0,
            json_path: json_path.into(),
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(WebMetricHeader {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: i64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Returns the effective request timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use webmetric::models::WebMetric;
    ///
    /// let web = WebMetric::new("http://localhost", "$.value").with_timeout_seconds(-1);
    /// assert_eq!(web.timeout().as_secs(), 10);
    /// ```
    #[must_use]
    pub fn timeout(&self) -> Duration {
        match u64::try_from(self.timeout_seconds) {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Provider-specific configuration, tagged by provider kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum ProviderSpec {
    /// Web metric provider configuration.
    Web(WebMetric),
}

impl ProviderSpec {
    /// Returns the provider kind tag.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Web(_) => ProviderKind::Web,
        }
    }
}

/// A metric definition.
///
/// Immutable configuration owned by the caller. Providers only read it.
///
/// # Example
///
/// ```
/// use webmetric::models::{MetricSpec, ProviderKind, WebMetric};
///
/// let metric = MetricSpec::new(
///     "error-rate",
///     WebMetric::new("http://metrics.local/error-rate", "$.rate"),
/// )
/// .with_success_condition("result < 0.05");
///
/// assert_eq!(metric.provider.kind(), ProviderKind::Web);
/// assert!(metric.failure_condition.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    /// The name of the metric.
    pub name: String,

    /// Expression that must hold for the measurement to succeed. Empty means unset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub success_condition: String,

    /// Expression that marks the measurement as failed. Empty means unset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub failure_condition: String,

    /// Provider configuration.
    pub provider: ProviderSpec,
}

impl MetricSpec {
    /// Creates a web metric with no conditions.
    #[must_use]
    pub fn new(name: impl Into<String>, web: WebMetric) -> Self {
        Self {
            name: name.into(),
            success_condition: String::new(),
            failure_condition: String::new(),
            provider: ProviderSpec::Web(web),
        }
    }

    /// Sets the success condition.
    #[must_use]
    pub fn with_success_condition(mut self, condition: impl Into<String>) -> Self {
        self.success_condition = condition.into();
        self
    }

    /// Sets the failure condition.
    #[must_use]
    pub fn with_failure_condition(mut self, condition: impl Into<String>) -> Self {
        self.failure_condition = condition.into();
        self
    }

    /// Returns the web provider configuration, if this is a web metric.
    #[must_use]
    pub fn web(&self) -> Option<&WebMetric> {
        match &self.provider {
            ProviderSpec::Web(web) => Some(web),
        }
    }

    /// Mutable access to the web provider configuration.
    pub fn web_mut(&mut self) -> Option<&mut WebMetric> {
        match &mut self.provider {
            ProviderSpec::Web(web) => Some(web),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_default_when_unset() {
        let web = WebMetric::new("http://localhost", "$.value");
        assert_eq!(web.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_timeout_default_when_not_positive() {
        for secs in [0, -1, i64::MIN] {
            let web = WebMetric::new("http://localhost", "$.value").with_timeout_seconds(secs);
            assert_eq!(web.timeout(), Duration::from_secs(10), "timeout {secs}");
        }
    }

    #[test]
    fn test_timeout_configured() {
        let web = WebMetric::new("http://localhost", "$.value").with_timeout_seconds(3);
        assert_eq!(web.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_headers_keep_order() {
        let web = WebMetric::new("http://localhost", "$.value")
            .with_header("X-First", "1")
            .with_header("X-Second", "2");

        let keys: Vec<&str> = web.headers.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["X-First", "X-Second"]);
    }

    #[test]
    fn test_metric_deserialize_camel_case() {
        let json = r#"{
            "name": "success-rate",
            "successCondition": "result >= 0.95",
            "provider": {
                "web": {
                    "url": "http://prometheus.local/api/v1/query",
                    "headers": [{"key": "Authorization", "value": "Bearer abc"}],
                    "timeoutSeconds": 20,
                    "jsonPath": "{$.data.result}"
                }
            }
        }"#;

        let metric: MetricSpec = serde_json::from_str(json).unwrap();
        assert_eq!(metric.name, "success-rate");
        assert_eq!(metric.success_condition, "result >= 0.95");
        assert!(metric.failure_condition.is_empty());

        let web = metric.web().unwrap();
        assert_eq!(web.url, "http://prometheus.local/api/v1/query");
        assert_eq!(web.headers.len(), 1);
        assert_eq!(web.headers[0].value, "Bearer abc");
        assert_eq!(web.timeout(), Duration::from_secs(20));
        assert_eq!(web.json_path, "{$.data.result}");
    }

    #[test]
    fn test_metric_deserialize_defaults() {
        let json = r#"{
            "name": "minimal",
            "provider": {"web": {"url": "http://localhost", "jsonPath": "$.v"}}
        }"#;

        let metric: MetricSpec = serde_json::from_str(json).unwrap();
        let web = metric.web().unwrap();
        assert!(web.headers.is_empty());
        assert_eq!(web.timeout_seconds, 0);
        assert!(metric.success_condition.is_empty());
    }

    #[test]
    fn test_metric_serialize_omits_empty_conditions() {
        let metric = MetricSpec::new("m", WebMetric::new("http://localhost", "$.v"));
        let json = serde_json::to_value(&metric).unwrap();

        assert!(json.get("successCondition").is_none());
        assert!(json.get("failureCondition").is_none());
        assert_eq!(json["provider"]["web"]["jsonPath"], "$.v");
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Web.to_string(), "web");
    }
}
