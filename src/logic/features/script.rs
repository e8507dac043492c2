//! Script Extractor - Python source analysis
//!
//! Three layers with different failure tolerance:
//! - substring flags and protocol tags work on the raw text, always
//! - import harvesting is line-oriented pattern scanning, tolerant of
//!   files that fail full parsing
//! - function and parameter structure comes from a real parse; on a
//!   syntax error the functions category carries a single error marker
//!   and structural extraction stops there

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser, Point};

use super::bag::FeatureBag;

/// Suspicious API substrings presence-flagged into `strings`. Binary
/// indicators: one entry per matched API regardless of occurrence count.
const SUSPICIOUS_APIS: &[&str] = &[
    "os.system",
    "subprocess",
    "eval",
    "exec",
    "open",
    "socket",
    "shutil",
    "ctypes",
    "getenv",
    "hashlib",
    "base64",
];

/// Protocol keywords matched case-insensitively anywhere in the source.
const PROTOCOL_KEYWORDS: &[&str] = &["http", "ftp", "smtp", "dns"];

// `import a, b.c` and `from x.y import z` module captures
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*import\s+([A-Za-z_][\w.]*(?:\s*,\s*[A-Za-z_][\w.]*)*)").unwrap()
});
static FROM_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*from\s+([A-Za-z_][\w.]*)\s+import").unwrap());

pub fn extract(path: &Path) -> FeatureBag {
    match std::fs::read(path) {
        Ok(raw) => extract_from_source(&String::from_utf8_lossy(&raw)),
        Err(e) => {
            log::warn!("failed to read script {}: {}", path.display(), e);
            FeatureBag::new()
        }
    }
}

pub fn extract_from_source(source: &str) -> FeatureBag {
    let mut bag = FeatureBag::new();

    for api in SUSPICIOUS_APIS {
        if source.contains(api) {
            bag.strings.push((*api).to_string());
        }
    }

    let lowered = source.to_lowercase();
    for keyword in PROTOCOL_KEYWORDS {
        if lowered.contains(keyword) {
            bag.tag_protocol(keyword);
        }
    }

    harvest_imports(source, &mut bag);
    extract_declarations(source, &mut bag);

    bag
}

fn harvest_imports(source: &str, bag: &mut FeatureBag) {
    for capture in IMPORT_RE.captures_iter(source) {
        for module in capture[1].split(',') {
            let module = module.trim();
            if !module.is_empty() {
                bag.imports.push(module.to_string());
            }
        }
    }
    for capture in FROM_IMPORT_RE.captures_iter(source) {
        bag.imports.push(capture[1].trim().to_string());
    }
}

/// Parse the source and collect declared function names plus
/// `function:parameter` tokens, in declaration order, nested scopes
/// included. A syntax error replaces the whole structural result with
/// one marker recording the first error position.
fn extract_declarations(source: &str, bag: &mut FeatureBag) {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE.into();
    if parser.set_language(&language).is_err() {
        log::warn!("python grammar rejected by parser, skipping structural extraction");
        return;
    }
    let Some(tree) = parser.parse(source, None) else {
        log::warn!("python parse returned no tree, skipping structural extraction");
        return;
    };

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error_position(root).unwrap_or_else(|| root.start_position());
        bag.functions.push(format!(
            "SyntaxError: line {}, column {}",
            position.row + 1,
            position.column + 1
        ));
        return;
    }

    collect_definitions(root, source, bag);
}

fn collect_definitions(node: Node, source: &str, bag: &mut FeatureBag) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "function_definition" {
            if let Some(name_node) = child.child_by_field_name("name") {
                if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                    bag.functions.push(name.to_string());
                    if let Some(params) = child.child_by_field_name("parameters") {
                        collect_parameters(params, source, name, bag);
                    }
                }
            }
        }
        collect_definitions(child, source, bag);
    }
}

fn collect_parameters(params: Node, source: &str, function: &str, bag: &mut FeatureBag) {
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        if let Some(name) = parameter_name(child, source) {
            bag.params.push(format!("{}:{}", function, name));
        }
    }
}

/// Bare, typed, defaulted and splat parameters all reduce to their
/// identifier. Separators (`/`, `*`) have none and are skipped.
fn parameter_name(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" => node.utf8_text(source.as_bytes()).ok().map(str::to_string),
        "typed_parameter"
        | "default_parameter"
        | "typed_default_parameter"
        | "list_splat_pattern"
        | "dictionary_splat_pattern" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "identifier" {
                    return child.utf8_text(source.as_bytes()).ok().map(str::to_string);
                }
            }
            None
        }
        _ => None,
    }
}

fn first_error_position(node: Node) -> Option<Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(position) = first_error_position(child) {
            return Some(position);
        }
    }
    None
}
