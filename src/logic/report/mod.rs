//! Report Module - triage report assembly and JSON persistence
//!
//! One report per analyzed sample. Every run gets a fresh id and
//! timestamp; the file name is derived from the sample name so reruns
//! of the same sample overwrite their previous report.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::logic::behavior::BehaviorSummary;
use crate::logic::features::FeatureBag;
use crate::logic::model::{ClassificationMethod, ClassificationResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    /// Path of the analyzed sample as given.
    pub file: String,
    /// None when the sample could not be hashed.
    pub sha256: Option<String>,
    pub predicted_family: String,
    pub confidence: f32,
    pub classification_method: ClassificationMethod,
    pub behavior: BehaviorSummary,
    pub features: FeatureBag,
    pub functions: Vec<String>,
    pub explanation: String,
}

impl TriageReport {
    pub fn build(
        path: &Path,
        bag: FeatureBag,
        classification: ClassificationResult,
        behavior: BehaviorSummary,
        explanation: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            file: path.display().to_string(),
            sha256: sha256_of_file(path),
            predicted_family: classification.family,
            confidence: classification.confidence,
            classification_method: classification.method,
            behavior,
            functions: bag.functions.clone(),
            features: bag,
            explanation,
        }
    }

    /// Write `<reports_dir>/<sample name>_report.json`, creating the
    /// directory when missing. Returns the written path.
    pub fn write_json(&self, reports_dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(reports_dir)?;

        let sample_name = Path::new(&self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sample");
        let out_path = reports_dir.join(format!("{}_report.json", sample_name));

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&out_path, json)?;
        Ok(out_path)
    }
}

/// Streaming SHA-256 of a file; None when it cannot be read.
pub fn sha256_of_file(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 4096];
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(_) => return None,
        }
    }
    Some(hex::encode(hasher.finalize()))
}
