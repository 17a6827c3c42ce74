use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::LabResult;
use crate::scoring::SessionResult;

/// One finished session as stored in the results log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Local>,
    pub theme: String,
    pub duration_secs: u32,
    pub wpm: u32,
    pub accuracy_percent: u32,
    pub correct_chars: usize,
}

impl HistoryRecord {
    pub fn new(theme: &str, duration_secs: u32, result: &SessionResult) -> Self {
        Self {
            timestamp: Local::now(),
            theme: theme.to_string(),
            duration_secs,
            wpm: result.wpm,
            accuracy_percent: result.accuracy_percent,
            correct_chars: result.correct_character_count,
        }
    }
}

/// Append-only csv log of finished sessions. Best-effort: callers log and
/// carry on when it fails.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn default_location() -> Option<Self> {
        AppDirs::history_path().map(Self::with_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> LabResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // A missing or empty log file needs a header first
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        wtr.serialize(record)?;
        wtr.flush()?;
        Ok(())
    }

    /// All readable records; an absent log is an empty history.
    pub fn load(&self) -> LabResult<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let records = rdr
            .deserialize::<HistoryRecord>()
            .filter_map(Result::ok)
            .collect();
        Ok(records)
    }

    /// Highest wpm logged for this theme and duration
    pub fn personal_best(&self, theme: &str, duration_secs: u32) -> LabResult<Option<u32>> {
        let best = self
            .load()?
            .into_iter()
            .filter(|r| r.theme == theme && r.duration_secs == duration_secs)
            .map(|r| r.wpm)
            .max();
        Ok(best)
    }
}
