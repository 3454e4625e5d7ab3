//! JSONL persistence for generated traces.
//!
//! Each line of the output file is one [`TraceRecord`]. Records are appended,
//! so a file accumulates every trace exported across runs.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use peakscope_trace::Trace;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A trace together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Unique identifier for this record.
    pub record_id: String,

    /// When the trace was generated.
    pub recorded_at: DateTime<Utc>,

    /// How the input was obtained (e.g. "input", "random", "case:Single element").
    pub source: String,

    /// The input sequence.
    pub input: Vec<i64>,

    /// Index of the peak.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_index: Option<usize>,

    /// Whether the peak came from the fallback scan.
    pub used_fallback: bool,

    /// The full step trace.
    pub trace: Trace,
}

impl TraceRecord {
    pub fn new(source: impl Into<String>, trace: Trace) -> Self {
        Self {
            record_id: uuid::Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            source: source.into(),
            input: trace.input().map(<[i64]>::to_vec).unwrap_or_default(),
            peak_index: trace.peak_index(),
            used_fallback: trace.used_fallback(),
            trace,
        }
    }
}

/// Configuration for the trace writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Full path of the JSONL file.
    pub path: PathBuf,

    /// Whether writing is enabled.
    pub enabled: bool,
}

impl WriterConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            enabled: false,
        }
    }
}

/// Appends trace records to a JSONL file.
///
/// Thread-safe via internal mutex. The file is opened on first write.
pub struct TraceWriter {
    config: WriterConfig,
    file: Mutex<Option<BufWriter<File>>>,
}

impl TraceWriter {
    /// Create a writer, making the parent directory if needed.
    pub fn new(config: WriterConfig) -> Result<Self> {
        if config.enabled {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            config,
            file: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Append one record.
    pub fn write(&self, record: &TraceRecord) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.config.path)?;
            *guard = Some(BufWriter::new(file));
        }

        if let Some(writer) = guard.as_mut() {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{line}")?;
            writer.flush()?;
        }

        tracing::debug!(
            record_id = %record.record_id,
            path = %self.config.path.display(),
            "trace record written"
        );
        Ok(())
    }

    /// Read every record from a JSONL file.
    pub fn read_records(path: &Path) -> Result<Vec<TraceRecord>> {
        let content = fs::read_to_string(path)?;
        let records = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakscope_trace::generate;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("traces.jsonl");
        let writer = TraceWriter::new(WriterConfig::new(&path)).unwrap();

        writer
            .write(&TraceRecord::new("input", generate(&[3, 1, 2])))
            .unwrap();
        writer
            .write(&TraceRecord::new("random", generate(&[1, 2, 3])))
            .unwrap();

        let records = TraceWriter::read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "input");
        assert_eq!(records[0].input, vec![3, 1, 2]);
        assert_eq!(records[0].peak_index, Some(0));
        assert!(!records[0].used_fallback);
        assert!(records[1].used_fallback);
        assert_eq!(records[1].trace, generate(&[1, 2, 3]));
    }

    #[test]
    fn test_append_across_writers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("traces.jsonl");
        for _ in 0..2 {
            let writer = TraceWriter::new(WriterConfig::new(&path)).unwrap();
            writer
                .write(&TraceRecord::new("input", generate(&[2])))
                .unwrap();
        }
        assert_eq!(TraceWriter::read_records(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_disabled_writer() {
        let writer = TraceWriter::new(WriterConfig::disabled()).unwrap();
        writer
            .write(&TraceRecord::new("input", generate(&[2])))
            .unwrap();
        assert_eq!(writer.path(), Path::new(""));
    }
}
