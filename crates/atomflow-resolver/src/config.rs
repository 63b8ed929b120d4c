//! Resolver configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for cross-file resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Atom count above which `resolve_all_parallel` shards across threads
    pub parallel_threshold: usize,
    /// Edges scoring below this are dropped
    pub min_confidence: f64,
    /// Default depth limit for journeys
    pub max_journey_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
            min_confidence: 0.0,
            max_journey_depth: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("min_confidence must be within [0, 1], got {0}")]
    MinConfidenceOutOfRange(f64),
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::MinConfidenceOutOfRange(self.min_confidence));
        }
        Ok(self)
    }
}
