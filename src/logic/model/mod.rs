//! Model Module - family classification over persisted artifacts
//!
//! Everything the model needs at inference time was persisted at
//! training time: schema, standardizer, label decoder, ONNX graph.
//! Nothing in this module derives layout from code.

pub mod adapter;
pub mod artifact;

pub use adapter::{ClassificationMethod, ClassificationResult, ClassifierContext};
pub use artifact::{ArtifactManifest, ClassifierArtifact, ScalerParams};
