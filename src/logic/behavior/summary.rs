//! Behavior Summarizer - deterministic heuristics over a feature bag
//!
//! Independent of the ML classifier on purpose: when the model is
//! degraded this summary is still produced, and when the model answers
//! the summary explains it in capability terms. Same bag in, same
//! statements out, in first-hit order without duplicates.

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureBag;
use super::rules::{
    IMPORT_RULES, NO_FINDINGS, PERMISSION_RULES, PROTOCOL_RULES, STMT_CREDENTIALS,
    STMT_KEYLOG, STMT_REMOTE_URL, STMT_SHELL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low under 3 distinct behaviors, Medium from 3 to 5, High at 6+.
    pub fn from_behavior_count(count: usize) -> Self {
        if count >= 6 {
            RiskLevel::High
        } else if count >= 3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorSummary {
    pub likely_behaviors: Vec<String>,
    pub risk_level: RiskLevel,
}

pub fn summarize_behavior(bag: &FeatureBag) -> BehaviorSummary {
    let mut behaviors: Vec<String> = Vec::new();

    for (tag, statement) in PROTOCOL_RULES {
        // HTTP also counts when a URL-ish string carries it
        let hit = bag.protocols.iter().any(|p| p == tag)
            || (*tag == "HTTP"
                && bag
                    .strings
                    .iter()
                    .any(|s| s.to_lowercase().contains("http")));
        if hit {
            push_unique(&mut behaviors, statement);
        }
    }

    for import in &bag.imports {
        let lowered = import.to_lowercase();
        for (needle, statement) in IMPORT_RULES {
            if lowered.contains(needle) {
                push_unique(&mut behaviors, statement);
            }
        }
    }

    for string in &bag.strings {
        let lowered = string.to_lowercase();
        if lowered.contains("password") {
            push_unique(&mut behaviors, STMT_CREDENTIALS);
        }
        if lowered.contains("cmd.exe") || lowered.contains("powershell") {
            push_unique(&mut behaviors, STMT_SHELL);
        }
        if lowered.contains("key") && lowered.contains("log") {
            push_unique(&mut behaviors, STMT_KEYLOG);
        }
        if lowered.contains("http://") || lowered.contains("https://") {
            push_unique(&mut behaviors, STMT_REMOTE_URL);
        }
    }

    for (tag, statement) in PERMISSION_RULES {
        if bag.permissions.iter().any(|p| p == tag) {
            push_unique(&mut behaviors, statement);
        }
    }

    if behaviors.is_empty() {
        behaviors.push(NO_FINDINGS.to_string());
    }

    let risk_level = RiskLevel::from_behavior_count(behaviors.len());
    BehaviorSummary {
        likely_behaviors: behaviors,
        risk_level,
    }
}

fn push_unique(behaviors: &mut Vec<String>, statement: &str) {
    if !behaviors.iter().any(|b| b == statement) {
        behaviors.push(statement.to_string());
    }
}
