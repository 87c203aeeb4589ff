//! JSONL file writer for round journal events.
//!
//! Each [`JournalEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered
//! writer.

use council_application::ports::journal::{JournalEvent, RoundJournal};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL round journal that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every record and
/// on `Drop` — the journal is append-only.
pub struct JsonlRoundJournal {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRoundJournal {
    /// Create a new journal appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!("Could not create journal directory {}: {}", parent.display(), e);
                    return None;
                }
            }
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open journal file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoundJournal for JsonlRoundJournal {
    fn record(&self, event: JournalEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Build the record: merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlRoundJournal {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_journal_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.jsonl");
        let journal = JsonlRoundJournal::new(&path).unwrap();

        journal.record(JournalEvent::new(
            "round_completed",
            serde_json::json!({
                "input": "I'm exhausted but need to finish this project",
                "consensus": "agreement",
                "confidence": 0.62
            }),
        ));

        journal.record(JournalEvent::new(
            "candidate_evaluated",
            serde_json::json!({
                "recommendation": "Take a rest break",
            }),
        ));

        drop(journal);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("type").is_some());
            assert!(value.get("timestamp").is_some());
        }

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "round_completed");
        assert_eq!(first["consensus"], "agreement");
    }

    #[test]
    fn test_journal_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.jsonl");

        {
            let journal = JsonlRoundJournal::new(&path).unwrap();
            journal.record(JournalEvent::new("round_completed", serde_json::json!({})));
        }
        {
            let journal = JsonlRoundJournal::new(&path).unwrap();
            journal.record(JournalEvent::new("round_completed", serde_json::json!({})));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }
}
