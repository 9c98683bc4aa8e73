//! Metric configuration for the CLI.
//!
//! A metric is loaded from a JSON file (`--metric`), built from flags, or
//! both: flags that are set override the values read from the file. Every
//! flag can also be supplied through its `WEBMETRIC_*` environment variable.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use webmetric::models::{MetricSpec, WebMetric, WebMetricHeader};

/// Name given to metrics built from flags alone.
pub const DEFAULT_METRIC_NAME: &str = "webmetric";

/// Options describing the metric to run or validate.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricArgs {
    /// Load the metric definition from a JSON file
    #[arg(short, long, value_name = "FILE")]
    pub metric: Option<PathBuf>,

    /// URL to send the GET request to
    #[arg(short, long, env = "WEBMETRIC_URL")]
    pub url: Option<String>,

    /// JSONPath expression selecting the measured value
    #[arg(short, long, env = "WEBMETRIC_JSON_PATH")]
    pub json_path: Option<String>,

    /// Condition that marks the measurement successful
    #[arg(long = "success", env = "WEBMETRIC_SUCCESS_CONDITION")]
    pub success_condition: Option<String>,

    /// Condition that marks the measurement failed
    #[arg(long = "failure", env = "WEBMETRIC_FAILURE_CONDITION")]
    pub failure_condition: Option<String>,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "KEY=VALUE", value_parser = parse_header)]
    pub headers: Vec<WebMetricHeader>,

    /// Newline-separated KEY=VALUE headers, sent before any --header
    #[arg(long = "headers", value_name = "LIST", env = "WEBMETRIC_HEADERS", value_parser = parse_header_list)]
    pub header_list: Option<HeaderList>,

    /// Request timeout in seconds (values <= 0 use the default of 10)
    #[arg(short, long, env = "WEBMETRIC_TIMEOUT", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Metric name used in logs and output
    #[arg(short, long)]
    pub name: Option<String>,
}

impl MetricArgs {
    /// Resolves the metric definition.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The metric file cannot be read or is not a valid metric definition
    /// - Neither a file nor both `--url` and `--json-path` are given
    pub fn resolve(&self) -> Result<MetricSpec> {
        let mut metric = match &self.metric {
            Some(path) => load_metric(path)?,
            None => {
                let (Some(url), Some(json_path)) = (&self.url, &self.json_path) else {
                    bail!("either --metric or both --url and --json-path are required");
                };
                MetricSpec::new(DEFAULT_METRIC_NAME, WebMetric::new(url, json_path))
            }
        };

        self.apply_overrides(&mut metric);
        Ok(metric)
    }

    fn apply_overrides(&self, metric: &mut MetricSpec) {
        if let Some(name) = &self.name {
            metric.name.clone_from(name);
        }
        if let Some(condition) = &self.success_condition {
            metric.success_condition.clone_from(condition);
        }
        if let Some(condition) = &self.failure_condition {
            metric.failure_condition.clone_from(condition);
        }

        let Some(web) = metric.web_mut() else {
            return;
        };
        if let Some(url) = &self.url {
            web.url.clone_from(url);
        }
        if let Some(json_path) = &self.json_path {
            web.json_path.clone_from(json_path);
        }
        if let Some(timeout) = self.timeout {
            web.timeout_seconds = timeout;
        }
        if let Some(list) = &self.header_list {
            web.headers.extend(list.0.iter().cloned());
        }
        web.headers.extend(self.headers.iter().cloned());
    }
}

/// Headers given as one newline-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(pub Vec<WebMetricHeader>);

/// Reads a metric definition from a JSON file.
fn load_metric(path: &Path) -> Result<MetricSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metric file {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metric file {}", path.display()))
}

/// Parses a `KEY=VALUE` header argument.
///
/// The value may itself contain `=`.
pub fn parse_header(raw: &str) -> Result<WebMetricHeader, String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{raw}'"));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("header name is empty in '{raw}'"));
    }

    Ok(WebMetricHeader {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

/// Parses newline-separated `KEY=VALUE` headers. Blank lines are skipped.
///
/// Values may contain commas and semicolons, so only line breaks separate
/// entries.
pub fn parse_header_list(raw: &str) -> Result<HeaderList, String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_header)
        .collect::<Result<Vec<_>, _>>()
        .map(HeaderList)
}
