//! Webmetric Library
//!
//! This crate implements the web metric provider used by progressive-delivery
//! analysis: it fetches a JSON document over HTTP, extracts a single value with
//! a JSONPath expression, infers the value's primitive type and classifies it
//! against the metric's success and failure conditions.
//!
//! # Modules
//!
//! - [`models`] - Metric definitions, measurements and phases
//! - [`value`] - Primitive type inference for extracted values
//! - [`extract`] - JSON parsing and JSONPath extraction
//! - [`condition`] - Condition expression language and the evaluator seam
//! - [`classify`] - Success/failure/inconclusive classification
//! - [`provider`] - The provider contract and the web metric provider
//!
//! # Example
//!
//! ```
//! use webmetric::classify::classify;
//! use webmetric::condition::ExpressionEvaluator;
//! use webmetric::models::Phase;
//! use webmetric::value::coerce;
//!
//! let value = coerce("7");
//! let phase = classify(&value, "result >= 5", "", &ExpressionEvaluator).unwrap();
//!
//! assert_eq!(phase, Phase::Successful);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod condition;
pub mod extract;
pub mod models;
pub mod provider;
pub mod value;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde_json;
