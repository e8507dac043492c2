//! Malware Triage Core - Static Analysis Library
//!
//! Feature extraction, schema-bound vectorization, ONNX family
//! classification, behavior heuristics and JSON reporting, used by the
//! bundled CLI and by embedding collaborators.

pub mod constants;
pub mod logic;
