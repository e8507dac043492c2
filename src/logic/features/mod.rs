//! Features Module - Feature Extraction Engine
//!
//! Turns a file on disk into an always-total feature bag, then into a
//! schema-bound numeric vector. Extraction strategy is picked by the
//! dispatcher; every extractor degrades to a partial bag instead of
//! failing the pipeline.

pub mod archive;
pub mod bag;
pub mod binary;
pub mod bytes;
pub mod dispatch;
pub mod schema;
pub mod script;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use bag::{FeatureBag, FeatureCategory};
pub use dispatch::extract_features;
pub use schema::{FeatureSchema, DERIVED_FEATURE_COUNT};
pub use vector::VectorBuilder;
