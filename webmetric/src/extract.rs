//! JSON parsing and JSONPath extraction.
//!
//! The path expression is compiled once when a provider is built and then
//! evaluated against every response body.
//!
//! Both RFC 9535 paths (`$.data.count`) and the Kubernetes template form
//! (`{$.data.count}` or `{.data.count}`) are accepted.
//!
//! # Multiple matches
//!
//! A path is expected to select one scalar. When it selects several nodes,
//! each node is rendered and the results are joined with a single space.

use serde_json::Value;
use serde_json_path::JsonPath;
use thiserror::Error;

/// The JSONPath expression could not be compiled.
#[derive(Debug, Error)]
#[error("invalid JSONPath expression '{expression}': {source}")]
pub struct CompileError {
    /// The expression as configured.
    pub expression: String,
    /// The underlying parser error.
    #[source]
    pub source: serde_json_path::ParseError,
}

/// Errors that can occur while extracting a value from a response body.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The body was empty.
    #[error("Received no bytes in response")]
    EmptyBody,

    /// The body is not valid JSON.
    #[error("Could not parse JSON body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The path did not resolve against the document.
    #[error("Could not find JSONPath {expression} in body")]
    NoMatch {
        /// The expression that did not match.
        expression: String,
    },
}

impl ExtractError {
    /// Returns true for errors caused by a body that is not a JSON document.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::EmptyBody | Self::Parse(_))
    }
}

/// A compiled JSONPath expression.
///
/// # Example
///
/// ```
/// use webmetric::extract::JsonPathExtractor;
///
/// let extractor = JsonPathExtractor::compile("{$.count}").unwrap();
/// let value = extractor.extract(br#"{"count": 7}"#).unwrap();
/// assert_eq!(value, "7");
/// ```
#[derive(Debug)]
pub struct JsonPathExtractor {
    expression: String,
    path: JsonPath,
}

impl JsonPathExtractor {
    /// Compiles a path expression.
    ///
    /// # Errors
    ///
    /// Returns a `CompileError` if the expression is not a valid JSONPath.
    pub fn compile(expression: &str) -> Result<Self, CompileError> {
        let normalized = normalize(expression);
        let path = JsonPath::parse(&normalized).map_err(|source| CompileError {
            expression: expression.to_string(),
            source,
        })?;

        Ok(Self {
            expression: expression.to_string(),
            path,
        })
    }

    /// The expression as configured.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Parses `body` as JSON and renders the node the path selects.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The body is empty
    /// - The body is not valid JSON
    /// - The path selects no node
    pub fn extract(&self, body: &[u8]) -> Result<String, ExtractError> {
        if body.is_empty() {
            return Err(ExtractError::EmptyBody);
        }

        let document: Value = serde_json::from_slice(body)?;
        let nodes = self.path.query(&document).all();

        if nodes.is_empty() {
            return Err(ExtractError::NoMatch {
                expression: self.expression.clone(),
            });
        }

        let rendered: Vec<String> = nodes.into_iter().map(render_node).collect();
        Ok(rendered.join(" "))
    }
}

/// Strips a template wrapper and makes the path absolute.
fn normalize(expression: &str) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map_or(trimmed, str::trim);

    if inner.starts_with('$') {
        inner.to_string()
    } else {
        format!("${inner}")
    }
}

/// Renders a node as text. Strings are rendered without quotes.
///
/// Numbers are rendered the way [`PrimitiveValue`](crate::value::PrimitiveValue)
/// displays them, so a whole float such as `42.0` reads back as `42`.
fn render_node(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        Value::Number(n) => render_number(n),
        other => other.to_string(),
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}
