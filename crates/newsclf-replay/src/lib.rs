//! newsclf Replay
//!
//! Offline batch client: reads one JSON request body per line and posts each
//! of them, in order, to a running server's `/predict` route.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a replay run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Requests posted
    pub sent: usize,

    /// Requests answered with a 2xx status
    pub succeeded: usize,

    /// Requests answered with any other status
    pub failed: usize,
}

#[derive(Deserialize)]
struct PredictionSummary {
    label: String,
}

/// Sequential replay client
pub struct Replayer {
    client: reqwest::Client,
    endpoint: String,
}

impl Replayer {
    /// Create a replayer targeting `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the prediction route
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replay every non-blank line of `path`.
    ///
    /// Non-2xx answers are counted and the replay continues; transport
    /// errors abort it.
    pub async fn replay_file(&self, path: &Path) -> Result<ReplayReport> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        self.replay_lines(content.lines()).await
    }

    /// Replay request bodies one after another
    pub async fn replay_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;

            let start = Instant::now();
            let response = self
                .client
                .post(&self.endpoint)
                .header("content-type", "application/json")
                .body(line.to_string())
                .send()
                .await
                .with_context(|| format!("line {}: request to {} failed", line_no, self.endpoint))?;
            report.sent += 1;

            let status = response.status();
            if status.is_success() {
                report.succeeded += 1;
                match response.json::<PredictionSummary>().await {
                    Ok(summary) => info!(
                        "line {}: {} in {:?}",
                        line_no,
                        summary.label,
                        start.elapsed()
                    ),
                    Err(e) => debug!("line {}: unreadable response body: {}", line_no, e),
                }
            } else {
                report.failed += 1;
                let body = response.text().await.unwrap_or_default();
                warn!("line {}: server answered {}: {}", line_no, status, body);
            }
        }

        Ok(report)
    }
}
