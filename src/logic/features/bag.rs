//! Feature Bag - the always-total container of extracted indicators
//!
//! Every extractor returns a bag with all categories present. A category
//! an extractor does not understand stays empty; downstream consumers
//! never branch on missing keys. Order inside a category is extraction
//! order and is preserved through merges.

use serde::{Deserialize, Serialize};

/// Canonical categories, in the order they feed the vector builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Protocols,
    Permissions,
    Files,
    Strings,
    Imports,
    Assembly,
    Functions,
    Params,
}

impl FeatureCategory {
    pub const ALL: [FeatureCategory; 8] = [
        FeatureCategory::Protocols,
        FeatureCategory::Permissions,
        FeatureCategory::Files,
        FeatureCategory::Strings,
        FeatureCategory::Imports,
        FeatureCategory::Assembly,
        FeatureCategory::Functions,
        FeatureCategory::Params,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureCategory::Protocols => "protocols",
            FeatureCategory::Permissions => "permissions",
            FeatureCategory::Files => "files",
            FeatureCategory::Strings => "strings",
            FeatureCategory::Imports => "imports",
            FeatureCategory::Assembly => "assembly",
            FeatureCategory::Functions => "functions",
            FeatureCategory::Params => "params",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBag {
    /// Uppercase protocol tags (HTTP, FTP, SMTP, DNS).
    pub protocols: Vec<String>,
    /// Declared permissions (mobile manifests; empty for other formats).
    pub permissions: Vec<String>,
    /// Referenced file paths or names.
    pub files: Vec<String>,
    /// Printable strings and flagged API indicators.
    pub strings: Vec<String>,
    /// Imported modules (scripts) or linked libraries (binaries).
    pub imports: Vec<String>,
    /// Disassembled instruction texts.
    pub assembly: Vec<String>,
    /// Declared function names, or a single syntax-error sentinel.
    pub functions: Vec<String>,
    /// Parameter tokens in `function:parameter` form.
    pub params: Vec<String>,
}

impl FeatureBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, category: FeatureCategory) -> &[String] {
        match category {
            FeatureCategory::Protocols => &self.protocols,
            FeatureCategory::Permissions => &self.permissions,
            FeatureCategory::Files => &self.files,
            FeatureCategory::Strings => &self.strings,
            FeatureCategory::Imports => &self.imports,
            FeatureCategory::Assembly => &self.assembly,
            FeatureCategory::Functions => &self.functions,
            FeatureCategory::Params => &self.params,
        }
    }

    /// Record a protocol tag at most once, normalized to uppercase.
    pub fn tag_protocol(&mut self, protocol: &str) {
        let tag = protocol.to_uppercase();
        if !self.protocols.contains(&tag) {
            self.protocols.push(tag);
        }
    }

    /// Concatenate `other` onto this bag in traversal order. Repeated
    /// tokens stay repeated: counting later reflects repeated evidence.
    pub fn merge(&mut self, other: FeatureBag) {
        self.protocols.extend(other.protocols);
        self.permissions.extend(other.permissions);
        self.files.extend(other.files);
        self.strings.extend(other.strings);
        self.imports.extend(other.imports);
        self.assembly.extend(other.assembly);
        self.functions.extend(other.functions);
        self.params.extend(other.params);
    }

    pub fn token_count(&self) -> usize {
        FeatureCategory::ALL
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }
}
