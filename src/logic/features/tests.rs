//! Integration Tests for the Feature Extraction Pipeline
//!
//! Exercise the dispatcher, extractors and vector builder together on
//! real files written to scratch directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::logic::features::{
    extract_features, FeatureBag, FeatureSchema, VectorBuilder, DERIVED_FEATURE_COUNT,
};

const SCRIPT_SAMPLE: &str = r#"
import os, socket
from urllib import request

def beacon(host, port=8080):
    s = socket.socket()
    s.connect((host, port))
    os.system("whoami")
    return s

def cleanup():
    pass
"#;

fn write_sample(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn schema() -> FeatureSchema {
    FeatureSchema::new(
        1,
        vec![
            "HTTP".into(),
            "FTP".into(),
            "SMTP".into(),
            "DNS".into(),
            "os.system".into(),
            "subprocess".into(),
            "eval".into(),
            "exec".into(),
            "open".into(),
            "socket".into(),
            "shutil".into(),
            "ctypes".into(),
            "getenv".into(),
        ],
    )
}

#[test]
fn test_script_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "sample.py", SCRIPT_SAMPLE.as_bytes());

    let bag = extract_features(&path);
    assert_eq!(bag.functions, vec!["beacon", "cleanup"]);
    assert!(bag.params.contains(&"beacon:host".to_string()));
    assert!(bag.params.contains(&"beacon:port".to_string()));
    assert!(bag.imports.contains(&"os".to_string()));
    assert!(bag.imports.contains(&"socket".to_string()));
    assert!(bag.imports.contains(&"urllib".to_string()));
    assert!(bag.strings.contains(&"os.system".to_string()));
    assert!(bag.strings.contains(&"socket".to_string()));
}

#[test]
fn test_script_vector_counts_and_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "sample.py", SCRIPT_SAMPLE.as_bytes());
    let schema = schema();

    let bag = extract_features(&path);
    let vector = VectorBuilder::new(&schema).render(&bag, &path);
    assert_eq!(vector.len(), schema.len() + DERIVED_FEATURE_COUNT);

    let index_of = |token: &str| schema.tokens.iter().position(|t| t == token).unwrap();
    // flagged once in strings plus once as an import
    assert_eq!(vector[index_of("socket")], 2.0);
    assert_eq!(vector[index_of("os.system")], 1.0);
    assert_eq!(vector[index_of("FTP")], 0.0);

    // derived block: size > 0, string and import counts match the bag
    let base = schema.len();
    assert!(vector[base] > 0.0);
    assert_eq!(vector[base + 2], bag.strings.len() as f32);
    assert_eq!(vector[base + 3], bag.imports.len() as f32);
}

#[test]
fn test_binary_fallback_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = Vec::new();
    data.extend_from_slice(&[0x55, 0x48, 0x89, 0xe5, 0xc3]); // x86 prologue
    data.extend_from_slice(b"\x00http://c2.example/gate.php\x00password\x00");
    let path = write_sample(dir.path(), "dropper.dat", &data);

    let bag = extract_features(&path);
    assert_eq!(bag.protocols, vec!["HTTP".to_string()]);
    assert!(bag.strings.iter().any(|s| s.contains("c2.example")));
    assert!(!bag.assembly.is_empty());
    assert!(bag.functions.is_empty());
}

#[test]
fn test_archive_end_to_end_counts_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("bundle.zip");
    {
        let file = fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("a.py", options).unwrap();
        writer.write_all(b"import socket\n").unwrap();
        writer.start_file("b.py", options).unwrap();
        writer.write_all(b"import socket\n").unwrap();
        writer.finish().unwrap();
    }

    let schema = schema();
    let bag = extract_features(&zip_path);
    let vector = VectorBuilder::new(&schema).render(&bag, &zip_path);

    let socket_index = schema.tokens.iter().position(|t| t == "socket").unwrap();
    // one import plus one presence flag per member
    assert_eq!(vector[socket_index], 4.0);
}

#[test]
fn test_vector_length_is_input_independent() {
    let dir = tempfile::tempdir().unwrap();
    let schema = schema();
    let expected = schema.len() + DERIVED_FEATURE_COUNT;

    let script = write_sample(dir.path(), "a.py", b"def f():\n    pass\n");
    let binary = write_sample(dir.path(), "b.bin", &[0u8, 1, 2, 3]);
    let missing = dir.path().join("never-written.bin");

    let builder = VectorBuilder::new(&schema);
    assert_eq!(builder.render(&extract_features(&script), &script).len(), expected);
    assert_eq!(builder.render(&extract_features(&binary), &binary).len(), expected);
    assert_eq!(builder.render(&FeatureBag::new(), &missing).len(), expected);
}
