//! Vector Builder - schema-bound numeric rendering
//!
//! Renders a feature bag into the exact layout the model was trained
//! on: one count per schema token, in schema order, then the four
//! derived numerics. Tokens outside the schema are ignored; schema
//! tokens absent from the bag count zero. The builder never reorders,
//! inserts or drops positions on its own.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::bag::FeatureBag;
use super::bytes;
use super::schema::FeatureSchema;

/// Categories feeding the token-count portion, concatenated in this
/// order. Fixed at training time.
const COUNTED_CATEGORIES: usize = 5;

pub struct VectorBuilder<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> VectorBuilder<'a> {
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Render `bag` plus the derived numerics of the file at `path`.
    /// Total: an unreadable file contributes zero size and entropy
    /// rather than an error.
    pub fn render(&self, bag: &FeatureBag, path: &Path) -> Vec<f32> {
        let mut vector = Vec::with_capacity(self.schema.vector_len());

        let counts = token_counts(bag);
        for token in &self.schema.tokens {
            let count = counts.get(token.as_str()).copied().unwrap_or(0);
            vector.push(count as f32);
        }

        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let data = fs::read(path).unwrap_or_default();
        let entropy = bytes::shannon_entropy(&data);
        let num_strings = if bag.strings.is_empty() {
            bytes::printable_strings(&data).len()
        } else {
            bag.strings.len()
        };
        let num_imports = bag.imports.len();

        vector.push(file_size as f32);
        vector.push(entropy as f32);
        vector.push(num_strings as f32);
        vector.push(num_imports as f32);

        vector
    }
}

/// Exact-match occurrence counts over the five counted categories.
fn token_counts(bag: &FeatureBag) -> HashMap<&str, usize> {
    let categories: [&[String]; COUNTED_CATEGORIES] = [
        &bag.protocols,
        &bag.permissions,
        &bag.files,
        &bag.strings,
        &bag.imports,
    ];

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for category in categories {
        for token in category {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }
    counts
}
