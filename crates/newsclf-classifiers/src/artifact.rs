//! Serialized model parameters

use newsclf_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Artifact format understood by this build
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Parameters of a bag-of-words linear classifier, as exported by the
/// training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact format version
    pub format_version: u32,

    /// Model name or version tag
    #[serde(default = "default_name")]
    pub name: String,

    /// Category labels; defines the column order of `bias` and `weights`
    pub labels: Vec<String>,

    /// Per-label intercept
    pub bias: Vec<f64>,

    /// Per-token weight rows, one column per label
    #[serde(default)]
    pub weights: HashMap<String, Vec<f64>>,
}

fn default_name() -> String {
    "news-classifier".to_string()
}

impl ModelArtifact {
    /// Read and validate an artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::artifact(format!("failed to read {}: {}", path.display(), e))
        })?;

        let artifact: Self = serde_json::from_str(&content).map_err(|e| {
            Error::artifact(format!("failed to parse {}: {}", path.display(), e))
        })?;

        artifact.validate()?;
        Ok(artifact)
    }

    /// Check that the parameters are internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(Error::artifact(format!(
                "unsupported format version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.labels.is_empty() {
            return Err(Error::artifact("artifact defines no labels"));
        }

        let mut seen = HashSet::with_capacity(self.labels.len());
        for label in &self.labels {
            if !seen.insert(label.as_str()) {
                return Err(Error::artifact(format!("duplicate label '{}'", label)));
            }
        }

        let width = self.labels.len();
        if self.bias.len() != width {
            return Err(Error::artifact(format!(
                "bias has {} entries for {} labels",
                self.bias.len(),
                width
            )));
        }
        if self.bias.iter().any(|b| !b.is_finite()) {
            return Err(Error::artifact("bias contains a non-finite value"));
        }

        for (token, row) in &self.weights {
            if row.len() != width {
                return Err(Error::artifact(format!(
                    "weights for '{}' have {} entries for {} labels",
                    token,
                    row.len(),
                    width
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(Error::artifact(format!(
                    "weights for '{}' contain a non-finite value",
                    token
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            format_version: SUPPORTED_FORMAT_VERSION,
            name: "test".to_string(),
            labels: vec!["Business".to_string(), "Sports".to_string()],
            bias: vec![0.0, 0.0],
            weights: HashMap::from([("bank".to_string(), vec![1.0, -1.0])]),
        }
    }

    #[test]
    fn test_valid_artifact() {
        assert!(artifact().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut a = artifact();
        a.format_version = 7;
        assert!(a.validate().unwrap_err().to_string().contains("version 7"));
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let mut a = artifact();
        a.bias.push(0.5);
        assert!(a.validate().is_err());

        let mut a = artifact();
        a.weights.insert("goal".to_string(), vec![1.0]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let mut a = artifact();
        a.labels[1] = "Business".to_string();
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        let mut a = artifact();
        a.weights.insert("goal".to_string(), vec![f64::NAN, 0.0]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_name_defaults_when_absent() {
        let json = r#"{"format_version":1,"labels":["A"],"bias":[0.0]}"#;
        let a: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(a.name, "news-classifier");
        assert!(a.weights.is_empty());
    }
}
