//! Core types for newsclf

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probability per category label.
///
/// Ordered by label so that serialized responses and log lines are stable.
pub type Scores = BTreeMap<String, f64>;

/// A single news item submitted for classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Publisher or feed name
    pub source: String,

    /// Link to the article
    pub url: String,

    /// Headline
    pub title: String,

    /// Short summary of the article
    pub description: String,
}

impl PredictRequest {
    /// Create a new request
    pub fn new(
        source: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Parse a raw request body.
    ///
    /// Every failure (empty body, malformed JSON, missing or non-string
    /// field) is reported as [`Error::Validation`].
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::validation("request body is empty"));
        }

        // Derived impls also accept JSON arrays; only objects are valid bodies.
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| Error::validation(e.to_string()))?;
        if !value.is_object() {
            return Err(Error::validation("request body must be a JSON object"));
        }

        serde_json::from_value(value).map_err(|e| Error::validation(e.to_string()))
    }
}

/// Response body for a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Probability for every known category
    pub scores: Scores,

    /// Most probable category
    pub label: String,
}

impl PredictResponse {
    /// Create a new response
    pub fn new(scores: Scores, label: impl Into<String>) -> Self {
        Self {
            scores,
            label: label.into(),
        }
    }

    /// Probability assigned to the predicted label
    pub fn confidence(&self) -> Option<f64> {
        self.scores.get(&self.label).copied()
    }
}
