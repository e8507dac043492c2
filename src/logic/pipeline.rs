//! Triage Pipeline - extract, classify, summarize, report
//!
//! The one place the stages meet. Always produces a report: degraded
//! stages annotate their portion of it instead of failing the run.

use std::path::Path;

use crate::logic::behavior::{self, BehaviorSummary};
use crate::logic::features::extract_features;
use crate::logic::model::{ClassificationResult, ClassifierContext};
use crate::logic::report::TriageReport;

pub fn analyze_file(path: &Path, context: &ClassifierContext) -> TriageReport {
    log::info!("analyzing {}", path.display());

    let bag = extract_features(path);
    log::debug!(
        "extracted {} tokens ({} functions, {} imports, {} strings)",
        bag.token_count(),
        bag.functions.len(),
        bag.imports.len(),
        bag.strings.len()
    );

    let classification = context.classify(&bag, path);
    let behavior = behavior::summarize_behavior(&bag);
    let explanation = source_explanation(path);

    log::info!(
        "{} -> {} ({:.2}), risk {}",
        path.display(),
        classification.family,
        classification.confidence,
        behavior.risk_level
    );

    TriageReport::build(path, bag, classification, behavior, explanation)
}

/// Convenience wrappers mirroring the report fields, mostly for tests
/// and embedding callers.
pub fn classify_file(path: &Path, context: &ClassifierContext) -> ClassificationResult {
    let bag = extract_features(path);
    context.classify(&bag, path)
}

pub fn summarize_file(path: &Path) -> BehaviorSummary {
    let bag = extract_features(path);
    behavior::summarize_behavior(&bag)
}

/// Script sources get a keyword explanation; everything else the fixed
/// binary line. Routing mirrors the dispatcher's extension rules.
fn source_explanation(path: &Path) -> String {
    let is_script = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("py"))
        .unwrap_or(false);
    if !is_script {
        return behavior::BINARY_EXPLANATION.to_string();
    }

    match std::fs::read(path) {
        Ok(raw) => behavior::describe_code(&String::from_utf8_lossy(&raw)),
        Err(_) => behavior::BINARY_EXPLANATION.to_string(),
    }
}
