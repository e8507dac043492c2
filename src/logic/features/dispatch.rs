//! Format Dispatcher - route a sample to its extraction strategy
//!
//! Routing is by lowercased extension only; content sniffing is left to
//! the extractors themselves. Unknown extensions are never an error:
//! they fall back to generic binary analysis, which tolerates anything.

use std::path::Path;

use super::archive;
use super::bag::FeatureBag;
use super::binary;
use super::script;
use crate::logic::errors::TriageError;

pub fn extract_features(path: &Path) -> FeatureBag {
    extract_at_depth(path, 0)
}

pub(super) fn extract_at_depth(path: &Path, depth: usize) -> FeatureBag {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "py" => script::extract(path),
        "zip" => archive::extract_at_depth(path, depth),
        "exe" | "dll" | "elf" | "bin" | "msi" => binary::extract(path),
        other => {
            log::debug!(
                "{} for {}, falling back to binary analysis",
                TriageError::UnsupportedFormat(other.to_string()),
                path.display()
            );
            binary::extract(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_py_routes_to_script_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.py");
        fs::write(&path, "def alpha():\n    pass\n").unwrap();

        let bag = extract_features(&path);
        assert_eq!(bag.functions, vec!["alpha"]);
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SAMPLE.PY");
        fs::write(&path, "def alpha():\n    pass\n").unwrap();

        let bag = extract_features(&path);
        assert_eq!(bag.functions, vec!["alpha"]);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.xyz");
        fs::write(&path, b"\x00SuspiciousMarker\x00").unwrap();

        let bag = extract_features(&path);
        assert!(bag.strings.contains(&"SuspiciousMarker".to_string()));
        assert!(bag.functions.is_empty());
    }

    #[test]
    fn test_no_extension_falls_back_to_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noext");
        fs::write(&path, b"\x00cmd.exe /c whoami\x00").unwrap();

        let bag = extract_features(&path);
        assert!(bag.strings.contains(&"cmd.exe /c whoami".to_string()));
    }

    #[test]
    fn test_python_source_with_binary_extension_gets_binary_treatment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.exe");
        fs::write(&path, "def alpha():\n    pass\n").unwrap();

        // routing is extension-only, so no structural extraction happens
        let bag = extract_features(&path);
        assert!(bag.functions.is_empty());
    }
}
