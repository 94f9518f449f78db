use crate::error::Result;
use crate::paths;
use callnote_core::{CallSummaryEvent, CanonicalPhone};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const NO_FAILURES_MESSAGE: &str = "No validation failures logged.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Append-only text log of rejected events.
///
/// Every entry is rendered in full and handed to a single `write_all` on a
/// handle opened in append mode, so entries from concurrent requests never
/// interleave mid-line. Ordering between requests is not preserved.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_validation_failure(
        &self,
        at: DateTime<Utc>,
        event: &CallSummaryEvent,
    ) -> Result<()> {
        let entry = format!(
            "[VALIDATION FAILURE] {} - Call ID: {}, From: {}, To: {}, Summary Length: {}\nSummary: {}\n",
            format_timestamp(at),
            event.call_id,
            event.from_number,
            event.to_number,
            event.summary_len(),
            event.summary
        );
        self.append(&entry)
    }

    pub fn record_phone_not_found(
        &self,
        at: DateTime<Utc>,
        call_id: &str,
        phone: &CanonicalPhone,
    ) -> Result<()> {
        let entry = format!(
            "[PHONE NOT FOUND] {} - Call ID: {}, Phone: {}\n",
            format_timestamp(at),
            call_id,
            phone
        );
        self.append(&entry)
    }

    /// Whole log contents, or `None` when nothing has been logged yet.
    pub fn read_all(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn read_or_default(&self) -> Result<String> {
        Ok(self
            .read_all()?
            .unwrap_or_else(|| NO_FAILURES_MESSAGE.to_string()))
    }

    fn append(&self, entry: &str) -> Result<()> {
        paths::ensure_parent_dir(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
