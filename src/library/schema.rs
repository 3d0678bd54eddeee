//! Persisted reference record
//!
//! One record holds one recording of one sign. The hand vectors are kept
//! exactly as captured, including all-zero frames for absent hands.

use super::store::StoreError;
use crate::landmarks::{HandFrame, Sequence};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format tag written into every record
pub const RECORD_FORMAT: &str = "sign-v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRecord {
    pub format: String,
    pub id: Uuid,
    pub label: String,
    pub recorded_at: DateTime<Utc>,
    pub frames: Vec<HandFrame>,
}

impl SignRecord {
    /// Create a new record for a freshly captured sequence
    pub fn new(label: &str, sequence: &Sequence) -> Self {
        Self {
            format: RECORD_FORMAT.to_string(),
            id: Uuid::new_v4(),
            label: label.to_string(),
            recorded_at: Utc::now(),
            frames: sequence.frames().to_vec(),
        }
    }

    /// Check that the record is something the matcher can use
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.format != RECORD_FORMAT {
            return Err(StoreError::InvalidRecord(format!(
                "unsupported format '{}'",
                self.format
            )));
        }
        if self.label.trim().is_empty() {
            return Err(StoreError::InvalidRecord("empty label".to_string()));
        }
        if self.frames.is_empty() {
            return Err(StoreError::InvalidRecord("no frames".to_string()));
        }
        for (i, frame) in self.frames.iter().enumerate() {
            frame
                .validate()
                .map_err(|e| StoreError::InvalidRecord(format!("frame {}: {}", i, e)))?;
        }
        Ok(())
    }

    /// Validate and convert into a labelled sequence
    pub fn into_sequence(self) -> Result<(String, Sequence), StoreError> {
        self.validate()?;
        let sequence =
            Sequence::new(self.frames).map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        Ok((self.label, sequence))
    }
}
