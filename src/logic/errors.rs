//! Error Taxonomy - failure classes of the triage pipeline
//!
//! Extraction failures degrade to partial feature bags and are logged at
//! the stage that observed them. Classifier failures degrade to sentinel
//! results. Only artifact loading and report writing bubble errors up to
//! the caller.

use std::path::PathBuf;
use thiserror::Error;

pub type TriageResult<T> = Result<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    /// No specialized extraction strategy for this extension. The
    /// dispatcher resolves this with the generic binary fallback.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A source file or container did not parse. The stage that hit it
    /// keeps whatever it extracted before the failure.
    #[error("parse failure in {path}: {detail}")]
    ParseFailure { path: PathBuf, detail: String },

    /// An unreadable file or archive member.
    #[error("extraction I/O error on {path}: {source}")]
    ExtractionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model, scaler, label decoder or schema failed to load, or the
    /// schema does not match the pairing recorded in the manifest.
    #[error("classifier artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Rendered vector length disagrees with the scaler dimensionality.
    /// Always a stale artifact pairing. Fatal for the request; must never
    /// be masked as a low-confidence prediction.
    #[error("vector/schema mismatch: rendered {rendered} values, scaler expects {expected}")]
    VectorSchemaMismatch { rendered: usize, expected: usize },

    /// The model ran but produced no usable answer for this request.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}
