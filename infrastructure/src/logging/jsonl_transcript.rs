//! JSONL file writer for barrier events.
//!
//! Each event is serialized as a single JSON line with a `type` field and
//! `timestamp`, appended to the file via a buffered writer.

use barrier_application::{BarrierError, BarrierReporter, Direction};
use barrier_domain::ParticipantId;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TranscriptRecord<'a> {
    Message {
        actor: ParticipantId,
        role: &'static str,
        direction: &'static str,
        token: &'a str,
    },
    PollSuccess {
        worker: ParticipantId,
    },
    Failure {
        actor: ParticipantId,
        role: &'static str,
        operation: &'static str,
        cause: String,
    },
    Complete,
}

#[derive(Serialize)]
struct TranscriptLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    record: TranscriptRecord<'a>,
}

/// JSONL transcript that writes one JSON object per event.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlTranscriptReporter {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptReporter {
    /// Create a new transcript writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, record: TranscriptRecord<'_>) {
        let line = TranscriptLine {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            record,
        };

        let Ok(line) = serde_json::to_string(&line) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl BarrierReporter for JsonlTranscriptReporter {
    fn on_message(&self, actor: ParticipantId, direction: Direction, token: &str) {
        self.write(TranscriptRecord::Message {
            actor,
            role: actor.role().as_str(),
            direction: direction.as_str(),
            token,
        });
    }

    fn on_poll_success(&self, worker: ParticipantId) {
        self.write(TranscriptRecord::PollSuccess { worker });
    }

    fn on_failure(&self, actor: ParticipantId, error: &BarrierError) {
        self.write(TranscriptRecord::Failure {
            actor,
            role: actor.role().as_str(),
            operation: error.operation(),
            cause: error.to_string(),
        });
    }

    fn on_complete(&self) {
        self.write(TranscriptRecord::Complete);
    }
}

impl Drop for JsonlTranscriptReporter {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_transcript_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let reporter = JsonlTranscriptReporter::new(&path).unwrap();

        reporter.on_message(ParticipantId::CONTROLLER, Direction::Sent, "::POLL::");
        reporter.on_message(ParticipantId::new(1), Direction::Received, "::POLL::");
        reporter.on_poll_success(ParticipantId::new(1));
        reporter.on_complete();
        drop(reporter);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line.get("timestamp").is_some());
        }

        assert_eq!(lines[0]["type"], "message");
        assert_eq!(lines[0]["actor"], 0);
        assert_eq!(lines[0]["role"], "controller");
        assert_eq!(lines[0]["direction"], "sent");
        assert_eq!(lines[0]["token"], "::POLL::");

        assert_eq!(lines[1]["role"], "worker");
        assert_eq!(lines[1]["direction"], "received");

        assert_eq!(lines[2]["type"], "poll_success");
        assert_eq!(lines[2]["worker"], 1);
        assert_eq!(lines[3]["type"], "complete");
    }

    #[test]
    fn test_failure_record_carries_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("failure.jsonl");
        let reporter = JsonlTranscriptReporter::new(&path).unwrap();
        assert_eq!(reporter.path(), path.as_path());

        let error = BarrierError::OperationTimeout {
            after: Duration::from_millis(250),
        };
        reporter.on_failure(ParticipantId::new(2), &error);
        drop(reporter);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "failure");
        assert_eq!(lines[0]["actor"], 2);
        assert_eq!(lines[0]["operation"], "waiting for channels");
        assert_eq!(lines[0]["cause"], "Worker timeout expired after 250 ms");
    }

    #[test]
    fn test_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlTranscriptReporter::new(blocker.join("run.jsonl")).is_none());
    }
}
