//! Recognizer configuration
//!
//! Tunable parameters for buffering, matching and storage. Every field has
//! a default, so a config file only needs the values it changes.

use crate::utils::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default capture window length in frames
pub const DEFAULT_MAX_FRAMES: usize = 50;

/// Default DTW acceptance threshold
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 25.0;

/// Default directory for recorded signs
pub const DEFAULT_SIGNS_DIR: &str = "data/signs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecognizerConfig {
    /// Frames after which a capture window flushes on its own
    pub max_frames: usize,

    /// Largest DTW distance still accepted as a match
    pub acceptance_threshold: f64,

    /// Where reference recordings are stored
    pub signs_dir: PathBuf,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            signs_dir: PathBuf::from(DEFAULT_SIGNS_DIR),
        }
    }
}

impl RecognizerConfig {
    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded config from {:?}: {:?}", path, config);

        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_frames == 0 {
            return Err(AppError::Config("maxFrames must be at least 1".to_string()));
        }
        if !self.acceptance_threshold.is_finite() || self.acceptance_threshold < 0.0 {
            return Err(AppError::Config(format!(
                "acceptanceThreshold must be a non-negative number, got {}",
                self.acceptance_threshold
            )));
        }
        Ok(())
    }
}
