//! Feature Schema - persisted training-time vocabulary
//!
//! The schema is the single source of truth for vector layout. It is
//! exported by the training side next to the model and loaded verbatim
//! at inference time; the token list is never rebuilt from code. Any
//! edit to the vocabulary must bump the version so stale model pairings
//! are refused instead of silently misread.

use std::fs;
use std::path::Path;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::errors::TriageError;

/// Derived numeric features appended after the token counts:
/// file size, entropy, string count, import count.
pub const DERIVED_FEATURE_COUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Bumped on any vocabulary change.
    pub version: u8,
    /// Ordered tokens; position defines vector position.
    pub tokens: Vec<String>,
}

impl FeatureSchema {
    pub fn new(version: u8, tokens: Vec<String>) -> Self {
        let mut schema = Self { version, tokens };
        schema.dedup();
        schema
    }

    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            TriageError::ArtifactUnavailable(format!("schema {}: {}", path.display(), e))
        })?;
        let mut schema: FeatureSchema = serde_json::from_str(&raw).map_err(|e| {
            TriageError::ArtifactUnavailable(format!("schema {}: {}", path.display(), e))
        })?;

        schema.dedup();
        if schema.tokens.is_empty() {
            return Err(TriageError::ArtifactUnavailable(format!(
                "schema {} has no tokens",
                path.display()
            )));
        }
        Ok(schema)
    }

    /// Drop duplicate tokens, keeping the first occurrence. The training
    /// export is expected to be duplicate-free already; finding one here
    /// means the export is suspect, so it is logged.
    fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let before = self.tokens.len();
        self.tokens.retain(|t| seen.insert(t.clone()));
        if self.tokens.len() < before {
            log::warn!(
                "feature schema contained {} duplicate token(s), kept first occurrences",
                before - self.tokens.len()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Total dimensionality of a vector rendered against this schema.
    pub fn vector_len(&self) -> usize {
        self.tokens.len() + DERIVED_FEATURE_COUNT
    }

    /// CRC32 over the version byte and each token (NUL-separated so
    /// token boundaries matter). Order-sensitive on purpose: reordering
    /// the vocabulary is a layout change.
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[self.version]);
        for token in &self.tokens {
            hasher.update(token.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }

    /// True when this schema is the one a manifest was trained against.
    pub fn matches(&self, version: u8, hash: u32) -> bool {
        self.version == version && self.layout_hash() == hash
    }
}
