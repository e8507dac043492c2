//! Behavior Module - rule-based summaries alongside the classifier
//!
//! # Components
//! - `rules.rs`: built-in rule tables (protocols, imports, strings, permissions)
//! - `summary.rs`: summarizer and risk bucketing
//! - `explain.rs`: one-line source explanations for reports

pub mod explain;
pub mod rules;
pub mod summary;

pub use explain::{describe_code, BINARY_EXPLANATION};
pub use summary::{summarize_behavior, BehaviorSummary, RiskLevel};
