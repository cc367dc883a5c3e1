//! Bag-of-words linear classifier
//!
//! Scores each category as `bias + sum(weight[token])` over the word tokens of
//! the record and turns the logits into probabilities with a softmax.

use crate::artifact::ModelArtifact;
use crate::classifier::Classifier;
use newsclf_core::{Error, PredictRequest, Result, Scores};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Unicode-aware word tokens
const TOKEN_PATTERN: &str = r"\w+";

pub struct LinearTextClassifier {
    name: String,
    labels: Vec<String>,
    bias: Vec<f64>,
    weights: HashMap<String, Vec<f64>>,
    tokenizer: Regex,
}

impl LinearTextClassifier {
    /// Load model parameters from a JSON artifact on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let artifact = ModelArtifact::from_path(path)?;
        let classifier = Self::from_artifact(artifact)?;

        info!(
            "Loaded model '{}' from {} ({} labels, {} tokens)",
            classifier.name,
            path.display(),
            classifier.labels.len(),
            classifier.weights.len()
        );

        Ok(classifier)
    }

    /// Build a classifier from in-memory parameters
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;

        let tokenizer = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::internal(format!("failed to build tokenizer: {e}")))?;

        Ok(Self {
            name: artifact.name,
            labels: artifact.labels,
            bias: artifact.bias,
            weights: artifact.weights,
            tokenizer,
        })
    }

    /// Number of tokens with learned weights
    pub fn vocabulary_size(&self) -> usize {
        self.weights.len()
    }

    fn probabilities(&self, record: &PredictRequest) -> Result<Vec<f64>> {
        let text = format!(
            "{} {} {}",
            record.source, record.title, record.description
        )
        .to_lowercase();

        let mut logits = self.bias.clone();
        let mut matched = 0usize;
        for token in self.tokenizer.find_iter(&text) {
            if let Some(row) = self.weights.get(token.as_str()) {
                matched += 1;
                for (logit, weight) in logits.iter_mut().zip(row) {
                    *logit += weight;
                }
            }
        }
        debug!("{} known tokens in record", matched);

        softmax(&logits)
    }
}

/// Numerically stable softmax
fn softmax(logits: &[f64]) -> Result<Vec<f64>> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(Error::inference("logits are not finite"));
    }

    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(Error::inference("probabilities do not normalize"));
    }

    Ok(exps.into_iter().map(|e| e / sum).collect())
}

impl Classifier for LinearTextClassifier {
    fn predict_proba(&self, record: &PredictRequest) -> Result<Scores> {
        let probs = self.probabilities(record)?;
        Ok(self.labels.iter().cloned().zip(probs).collect())
    }

    fn predict_label(&self, record: &PredictRequest) -> Result<String> {
        let probs = self.probabilities(record)?;

        // First maximum wins, so ties follow artifact label order.
        let mut best = 0;
        for (idx, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = idx;
            }
        }

        Ok(self.labels[best].clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::SUPPORTED_FORMAT_VERSION;

    fn classifier() -> LinearTextClassifier {
        let artifact = ModelArtifact {
            format_version: SUPPORTED_FORMAT_VERSION,
            name: "unit".to_string(),
            labels: vec!["Business".to_string(), "Sports".to_string()],
            bias: vec![0.0, 0.0],
            weights: HashMap::from([
                ("bank".to_string(), vec![2.0, 0.0]),
                ("goal".to_string(), vec![0.0, 2.0]),
                ("économie".to_string(), vec![1.0, 0.0]),
            ]),
        };
        LinearTextClassifier::from_artifact(artifact).unwrap()
    }

    fn record(title: &str) -> PredictRequest {
        PredictRequest::new("", "", title, "")
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]).unwrap();
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]).unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_rejects_infinite_logits() {
        assert!(softmax(&[f64::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        let clf = classifier();
        assert_eq!(clf.predict_label(&record("BANK results")).unwrap(), "Business");
        assert_eq!(clf.predict_label(&record("Late GOAL")).unwrap(), "Sports");
    }

    #[test]
    fn test_accented_tokens_match() {
        let clf = classifier();
        let scores = clf.predict_proba(&record("L'Économie")).unwrap();
        assert!(scores["Business"] > scores["Sports"]);
    }

    #[test]
    fn test_unknown_text_falls_back_to_bias() {
        let clf = classifier();
        let scores = clf.predict_proba(&record("¥€$ 天気")).unwrap();
        assert!((scores["Business"] - 0.5).abs() < 1e-9);
        assert_eq!(clf.predict_label(&record("¥€$ 天気")).unwrap(), "Business");
    }
}
