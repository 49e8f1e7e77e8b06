//! Immutable snapshot of one load: the flattened records plus what was skipped.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::record::UnitModelRecord;

/// Column schema of the flattened table, stable even when there are no rows.
pub const COLUMNS: [&str; 18] = [
    "Faction",
    "Unit Name",
    "Role",
    "Org Slot",
    "Points",
    "Troop Type",
    "Innate Rules",
    "Default Equipment",
    "Optional Upgrades",
    "M",
    "WS",
    "BS",
    "S",
    "T",
    "W",
    "I",
    "A",
    "Ld",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub files_seen: usize,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[UnitModelRecord]>,
    report: LoadReport,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: Vec<UnitModelRecord>, report: LoadReport) -> Self {
        Self {
            records: records.into(),
            report,
            loaded_at: Utc::now(),
        }
    }

    /// No documents, no rows; still answers [`Dataset::columns`].
    pub fn empty() -> Self {
        Self::new(Vec::new(), LoadReport::default())
    }

    pub fn records(&self) -> &[UnitModelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Summary for CLI/API consumers.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.len(),
            files_seen: self.report.files_seen,
            files_loaded: self.report.files_loaded,
            skipped: self.report.skipped.clone(),
            columns: self.columns().to_vec(),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub files_seen: usize,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedDocument>,
    pub columns: Vec<&'static str>,
    pub loaded_at: DateTime<Utc>,
}
