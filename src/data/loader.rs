//! Load every faction document in a folder into a [`Dataset`].
//!
//! Files are parsed in parallel; a file that cannot be read or parsed is logged and
//! recorded in the [`LoadReport`], and the rest still load. Only a folder that cannot be
//! listed at all is an error.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::dataset::{Dataset, LoadReport, SkippedDocument};
use crate::data::faction::FactionDocument;
use crate::data::flatten::flatten_documents;
use crate::data::price_table::{DEFAULT_EQUIPMENT_PRICES_FILE, DEFAULT_RULE_PRICES_FILE};

pub const DEFAULT_DATA_DIR: &str = "tow_data_json";

/// Fatal: the input is not a readable document list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data folder '{}' does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("unable to list data folder '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-document failure; never fatal for a folder load.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unable to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("unable to parse json: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn parse_faction_document(raw: &str) -> Result<FactionDocument, DocumentError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn read_faction_document(path: &Path) -> Result<FactionDocument, DocumentError> {
    let raw = fs::read_to_string(path)?;
    parse_faction_document(&raw)
}

/// `*.json` files directly inside `dir`, sorted, excluding the price-table files.
pub fn list_faction_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_faction_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_faction_file(path: &Path) -> bool {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let is_price_table = path.file_name().and_then(|n| n.to_str()).is_some_and(|name| {
        name == DEFAULT_EQUIPMENT_PRICES_FILE || name == DEFAULT_RULE_PRICES_FILE
    });
    is_json && !is_price_table
}

pub fn load_faction_dir(dir: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let dir = dir.as_ref();
    let files = list_faction_files(dir)?;
    info!(dir = %dir.display(), files = files.len(), "loading faction documents");
    Ok(load_faction_files(&files))
}

/// Parse `paths` in parallel and flatten the good ones in the given order.
pub fn load_faction_files(paths: &[PathBuf]) -> Dataset {
    let parsed: Vec<(&PathBuf, Result<FactionDocument, DocumentError>)> = paths
        .par_iter()
        .map(|path| (path, read_faction_document(path)))
        .collect();

    let mut report = LoadReport {
        files_seen: paths.len(),
        ..LoadReport::default()
    };
    let mut documents = Vec::with_capacity(parsed.len());
    for (path, result) in parsed {
        match result {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping faction document");
                report.skipped.push(SkippedDocument {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    report.files_loaded = documents.len();

    let records = flatten_documents(&documents);
    info!(
        loaded = report.files_loaded,
        skipped = report.skipped.len(),
        records = records.len(),
        "faction documents flattened"
    );
    Dataset::new(records, report)
}
