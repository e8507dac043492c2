//! Logic Module - Triage Engines
//!
//! ## Architecture
//! - `features/` - format dispatch, per-format extractors, schema-bound vectors
//! - `model/` - classifier artifacts and ONNX inference
//! - `behavior/` - rule-based behavior summaries and explanations
//! - `report/` - JSON report assembly
//! - `intel/` - MalwareBazaar sample acquisition (training side)
//! - `pipeline` - the end-to-end per-file flow

pub mod behavior;
pub mod config;
pub mod errors;
pub mod features;
pub mod intel;
pub mod model;
pub mod pipeline;
pub mod report;
