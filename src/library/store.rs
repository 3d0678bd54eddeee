//! Reference storage
//!
//! Signs are stored as a directory tree of JSON records:
//! - `<root>/<label>/`: one directory per sign, the name URL-encoded
//! - `<root>/<label>/<id>.json`: one recording of that sign
//!
//! A missing root is an empty store. Records that fail to parse or
//! validate are skipped and reported, they never abort a load.

use super::schema::SignRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid sign name: {0}")]
    InvalidLabel(String),
}

/// Result of loading every record from a store
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records that loaded and validated
    pub records: Vec<SignRecord>,

    /// Records that were skipped, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Persistence seam for reference recordings
pub trait SignStore: Send + Sync {
    /// Persist one recording
    fn save(&self, record: &SignRecord) -> Result<(), StoreError>;

    /// Load every readable recording
    fn load_all(&self) -> Result<LoadReport, StoreError>;

    /// Sign names with at least one readable recording, sorted
    fn list_labels(&self) -> Result<Vec<String>, StoreError>;
}

/// File extension of record files
pub const RECORD_EXTENSION: &str = "json";

/// JSON directory store
#[derive(Debug, Clone)]
pub struct FsSignStore {
    root: PathBuf,
}

impl FsSignStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn label_dir(&self, label: &str) -> Result<PathBuf, StoreError> {
        let encoded = urlencoding::encode(label);
        if encoded.is_empty() || encoded == "." || encoded == ".." {
            return Err(StoreError::InvalidLabel(label.to_string()));
        }
        Ok(self.root.join(&*encoded))
    }
}

impl SignStore for FsSignStore {
    fn save(&self, record: &SignRecord) -> Result<(), StoreError> {
        record.validate()?;

        let dir = self.label_dir(&record.label)?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join(format!("{}.{}", record.id, RECORD_EXTENSION));
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)?;

        tracing::info!(
            "Saved sign '{}' ({} frames) to {:?}",
            record.label,
            record.frames.len(),
            path
        );

        Ok(())
    }

    fn load_all(&self) -> Result<LoadReport, StoreError> {
        let mut report = LoadReport::default();

        if !self.root.exists() {
            tracing::debug!("Sign directory {:?} does not exist, nothing to load", self.root);
            return Ok(report);
        }

        for entry in fs::read_dir(&self.root)? {
            let label_dir = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.root, e);
                    report.skipped.push((self.root.clone(), e.to_string()));
                    continue;
                }
            };
            if !label_dir.is_dir() {
                continue;
            }

            let entries = match fs::read_dir(&label_dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Skipping unreadable sign directory {:?}: {}", label_dir, e);
                    report.skipped.push((label_dir, e.to_string()));
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !is_record_file(&path) {
                    continue;
                }

                match read_record(&path) {
                    Ok(record) => report.records.push(record),
                    Err(e) => {
                        tracing::warn!("Skipping corrupt sign record {:?}: {}", path, e);
                        report.skipped.push((path, e.to_string()));
                    }
                }
            }
        }

        // Directory order is unspecified; keep loads reproducible
        report
            .records
            .sort_by(|a, b| (&a.label, a.recorded_at, a.id).cmp(&(&b.label, b.recorded_at, b.id)));

        Ok(report)
    }

    fn list_labels(&self) -> Result<Vec<String>, StoreError> {
        // Same source as `load_all`, so a listed sign always has a reference
        let mut labels: Vec<String> = self
            .load_all()?
            .records
            .into_iter()
            .map(|record| record.label)
            .collect();
        labels.dedup();
        Ok(labels)
    }
}

/// Read and validate a single record file
pub fn read_record(path: &Path) -> Result<SignRecord, StoreError> {
    let content = fs::read_to_string(path)?;
    let record: SignRecord = serde_json::from_str(&content)?;
    record.validate()?;
    Ok(record)
}

fn is_record_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
}
