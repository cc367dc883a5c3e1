//! Classifier trait

use newsclf_core::{Error, PredictRequest, Result, Scores};

/// Trait for news category classifiers.
///
/// Implementations hold immutable parameters once constructed, so both
/// prediction methods take `&self` and may be called from many requests at
/// once without locking.
pub trait Classifier: Send + Sync {
    /// Full probability distribution over all known categories
    fn predict_proba(&self, record: &PredictRequest) -> Result<Scores>;

    /// Single most probable category.
    ///
    /// The default picks the highest entry of [`predict_proba`](Self::predict_proba),
    /// preferring the label listed first in [`labels`](Self::labels) on ties.
    fn predict_label(&self, record: &PredictRequest) -> Result<String> {
        let scores = self.predict_proba(record)?;

        let mut best: Option<(&str, f64)> = None;
        for label in self.labels() {
            let Some(&score) = scores.get(label) else {
                continue;
            };
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((label.as_str(), score));
            }
        }

        best.map(|(label, _)| label.to_string())
            .ok_or_else(|| Error::inference(format!("{} produced no scores", self.name())))
    }

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Known categories, in the model's own order
    fn labels(&self) -> &[String];
}
