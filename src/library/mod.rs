//! Reference library
//!
//! In-memory map from sign label to the recordings of that sign. Labels
//! iterate in lexicographic order, which is also the tie-break order the
//! matcher relies on.

pub mod schema;
pub mod store;

pub use schema::{SignRecord, RECORD_FORMAT};
pub use store::{FsSignStore, LoadReport, SignStore, StoreError};

use crate::landmarks::Sequence;
use crate::utils::{AppError, AppResult};
use std::collections::BTreeMap;

/// Labelled reference sequences
#[derive(Debug, Clone, Default)]
pub struct ReferenceLibrary {
    signs: BTreeMap<String, Vec<Sequence>>,
}

impl ReferenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the library from everything in `store`.
    ///
    /// A missing storage location gives an empty library. Corrupt records
    /// are skipped by the store and logged here.
    pub fn load(store: &dyn SignStore) -> AppResult<Self> {
        let report = store.load_all()?;

        if !report.skipped.is_empty() {
            tracing::warn!("Skipped {} unreadable sign record(s)", report.skipped.len());
        }

        let mut library = Self::new();
        for record in report.records {
            match record.into_sequence() {
                Ok((label, sequence)) => library.insert(&label, sequence),
                Err(e) => tracing::warn!("Skipping invalid sign record: {}", e),
            }
        }

        tracing::info!(
            "Loaded {} reference recording(s) for {} sign(s)",
            library.reference_count(),
            library.len()
        );

        Ok(library)
    }

    /// Add a reference in memory only
    pub fn insert(&mut self, label: &str, sequence: Sequence) {
        self.signs.entry(label.to_string()).or_default().push(sequence);
    }

    /// Persist a new recording and make it available for matching.
    ///
    /// The in-memory library only changes once the store accepted the record.
    pub fn add(&mut self, label: &str, sequence: Sequence, store: &dyn SignStore) -> AppResult<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::UserInput("sign name cannot be empty".to_string()));
        }

        store.save(&SignRecord::new(label, &sequence))?;
        self.insert(label, sequence);

        tracing::debug!(
            "Sign '{}' now has {} reference(s)",
            label,
            self.signs.get(label).map_or(0, Vec::len)
        );

        Ok(())
    }

    /// Known labels, sorted
    pub fn labels(&self) -> Vec<String> {
        self.signs.keys().cloned().collect()
    }

    pub fn references(&self, label: &str) -> Option<&[Sequence]> {
        self.signs.get(label).map(Vec::as_slice)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.signs.contains_key(label)
    }

    /// Labels with their references, in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sequence])> {
        self.signs
            .iter()
            .map(|(label, references)| (label.as_str(), references.as_slice()))
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Number of reference recordings across all labels
    pub fn reference_count(&self) -> usize {
        self.signs.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HandFrame, HAND_VECTOR_LEN};
    use std::fs;
    use tempfile::tempdir;

    fn sequence(value: f64, len: usize) -> Sequence {
        let frame =
            HandFrame::new(vec![value; HAND_VECTOR_LEN], vec![0.0; HAND_VECTOR_LEN]).unwrap();
        Sequence::new(vec![frame; len]).unwrap()
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let store = FsSignStore::new(dir.path().join("signs"));

        let library = ReferenceLibrary::load(&store).unwrap();

        assert!(library.is_empty());
        assert_eq!(library.reference_count(), 0);
    }

    #[test]
    fn test_add_persists_and_updates_immediately() {
        let dir = tempdir().unwrap();
        let store = FsSignStore::new(dir.path());
        let mut library = ReferenceLibrary::new();

        library.add("Hello", sequence(0.2, 3), &store).unwrap();
        library.add("Hello", sequence(0.3, 4), &store).unwrap();
        library.add("Goodbye", sequence(0.8, 2), &store).unwrap();

        assert_eq!(library.labels(), vec!["Goodbye", "Hello"]);
        assert_eq!(library.references("Hello").unwrap().len(), 2);

        let reloaded = ReferenceLibrary::load(&store).unwrap();
        assert_eq!(reloaded.labels(), library.labels());
        assert_eq!(reloaded.reference_count(), 3);
        assert_eq!(store.list_labels().unwrap(), vec!["Goodbye", "Hello"]);
    }

    #[test]
    fn test_add_rejects_blank_label() {
        let dir = tempdir().unwrap();
        let store = FsSignStore::new(dir.path());
        let mut library = ReferenceLibrary::new();

        let err = library.add("   ", sequence(0.2, 3), &store).unwrap_err();

        assert!(matches!(err, AppError::UserInput(_)));
        assert!(library.is_empty());
    }

    #[test]
    fn test_failed_persist_leaves_library_unchanged() {
        let dir = tempdir().unwrap();
        // A file where the store expects a directory makes every save fail
        let blocked = dir.path().join("signs");
        fs::write(&blocked, "not a directory").unwrap();
        let store = FsSignStore::new(&blocked);
        let mut library = ReferenceLibrary::new();

        let err = library.add("Hello", sequence(0.2, 3), &store).unwrap_err();

        assert!(matches!(err, AppError::Store(_)));
        assert!(!library.contains("Hello"));
    }

    #[test]
    fn test_load_skips_corrupt_and_keeps_others() {
        let dir = tempdir().unwrap();
        let store = FsSignStore::new(dir.path());
        let mut library = ReferenceLibrary::new();
        library.add("Hello", sequence(0.2, 3), &store).unwrap();

        let corrupt = dir.path().join("Thanks");
        fs::create_dir_all(&corrupt).unwrap();
        fs::write(corrupt.join("broken.json"), r#"{"format":"sign-v1"}"#).unwrap();

        let reloaded = ReferenceLibrary::load(&store).unwrap();

        assert_eq!(reloaded.labels(), vec!["Hello"]);
    }
}
