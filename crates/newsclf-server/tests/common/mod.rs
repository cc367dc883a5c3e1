//! Shared fixtures for server tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use newsclf_classifiers::Classifier;
use newsclf_core::{Error, PredictRequest, Result, Scores};
use newsclf_server::{ServerConfig, ServiceState};
use newsclf_telemetry::RequestLogger;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub fn demo_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/news_classifier.json")
}

pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        model_path: demo_model_path(),
        log_path: dir.join("logs.out"),
        ..Default::default()
    }
}

pub fn hsbc_body() -> Value {
    serde_json::json!({
        "source": "BBC Technology",
        "url": "http://news.bbc.co.uk/go/click/rss/0.91/public/-/2/hi/business/4144939.stm",
        "title": "System gremlins resolved at HSBC",
        "description": "Computer glitches which led to chaos for HSBC customers on Monday are fixed, the High Street bank confirms."
    })
}

pub fn log_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(body.into())
        .unwrap()
}

/// A configurable classifier double
pub struct MockClassifier {
    labels: Vec<String>,
    scores: Vec<f64>,
    fail: bool,
    proba_calls: AtomicU32,
    label_calls: AtomicU32,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            labels: vec!["Business".to_string(), "World".to_string()],
            scores: vec![0.9, 0.1],
            fail: false,
            proba_calls: AtomicU32::new(0),
            label_calls: AtomicU32::new(0),
        }
    }

    /// Make every prediction fail with an inference error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn proba_calls(&self) -> u32 {
        self.proba_calls.load(Ordering::Relaxed)
    }

    pub fn label_calls(&self) -> u32 {
        self.label_calls.load(Ordering::Relaxed)
    }
}

impl Classifier for MockClassifier {
    fn predict_proba(&self, _record: &PredictRequest) -> Result<Scores> {
        self.proba_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(Error::inference("unsupported input"));
        }
        Ok(self
            .labels
            .iter()
            .cloned()
            .zip(self.scores.iter().copied())
            .collect())
    }

    fn predict_label(&self, _record: &PredictRequest) -> Result<String> {
        self.label_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(Error::inference("unsupported input"));
        }
        Ok(self.labels[0].clone())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

pub fn mock_state(dir: &Path, classifier: Arc<MockClassifier>) -> ServiceState {
    let config = test_config(dir);
    let request_log = RequestLogger::open(&config.log_path).unwrap();
    ServiceState::from_parts(config, classifier, request_log)
}
