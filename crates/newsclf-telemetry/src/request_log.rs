//! Prediction request log
//!
//! One JSON object per line, appended and flushed before the handler returns:
//!
//! ```text
//! {"timestamp":"2024/03/01 12:00:00","request":{...},"prediction":{...},"latency":0.42}
//! ```
//!
//! The file is opened in append mode and never truncated or read back.

use chrono::{DateTime, Local};
use newsclf_core::{Error, PredictRequest, Result, Scores};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Layout of [`LogRecord::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One served prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Local time the request was received
    pub timestamp: String,

    /// The validated request
    pub request: PredictRequest,

    /// Scores returned by the classifier
    pub prediction: Scores,

    /// Time spent serving the request, in milliseconds
    pub latency: f64,
}

impl LogRecord {
    /// Create a new log record
    pub fn new(
        received_at: DateTime<Local>,
        request: PredictRequest,
        prediction: Scores,
        latency: Duration,
    ) -> Self {
        Self {
            timestamp: received_at.format(TIMESTAMP_FORMAT).to_string(),
            request,
            prediction,
            latency: latency.as_secs_f64() * 1000.0,
        }
    }

    /// Render the record as a single line, newline included
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Append-only sink for [`LogRecord`]s.
///
/// Each line is written unbuffered under one lock so concurrent handlers
/// never interleave partial lines, and a failed write leaves nothing behind
/// for a later append to carry into the file.
pub struct RequestLogger {
    path: PathBuf,
    sink: Mutex<Option<File>>,
}

impl RequestLogger {
    /// Open (or create) the log file in append mode
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::logging(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::logging(format!("failed to open {}: {}", path.display(), e)))?;

        info!("Request log opened at {:?}", path);

        Ok(Self {
            path,
            sink: Mutex::new(Some(file)),
        })
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the sink still accepts records
    pub fn is_open(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Append one record and flush it to the file
    pub fn append(&self, record: &LogRecord) -> Result<()> {
        let line = record.to_line()?;

        let mut sink = self.sink.lock();
        let file = sink
            .as_mut()
            .ok_or_else(|| Error::logging("log sink is closed"))?;

        write_line(file, line.as_bytes()).map_err(|e| {
            Error::logging(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Appended {} bytes to request log", line.len());
        Ok(())
    }

    /// Flush and release the file handle.
    ///
    /// Returns `false` if the sink was already closed.
    pub fn close(&self) -> Result<bool> {
        let Some(mut file) = self.sink.lock().take() else {
            warn!("Request log {:?} already closed", self.path);
            return Ok(false);
        };

        file.flush()
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                Error::logging(format!("failed to flush {}: {}", self.path.display(), e))
            })?;

        info!("Request log {:?} closed", self.path);
        Ok(true)
    }
}

/// Write a whole line or nothing.
///
/// Bytes that reached the file before an error are truncated away.
fn write_line(file: &mut File, line: &[u8]) -> io::Result<()> {
    let start = file.metadata()?.len();

    file.write_all(line).map_err(|e| {
        if file.metadata().map_or(false, |m| m.len() > start) {
            if let Err(trunc) = file.set_len(start) {
                warn!("Could not drop partial request log line: {}", trunc);
            }
        }
        e
    })
}
