//! Classifier Artifact - manifest, scaler, labels, ONNX session
//!
//! The training side exports four files into one directory: the ONNX
//! model, the standardizer parameters, the label decoder and the
//! feature schema. The manifest (pipeline.json) binds them together
//! and records which schema version/hash the model was trained on.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::constants::MANIFEST_FILE;
use crate::logic::errors::TriageError;

/// Standardizer parameters exported at training time: one mean and one
/// scale per vector position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl ScalerParams {
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// `(x - mean) / scale` per position. A dimensionality mismatch is
    /// a stale artifact pairing and is refused outright.
    pub fn transform(&self, vector: &[f32]) -> Result<Vec<f32>, TriageError> {
        if vector.len() != self.mean.len() {
            return Err(TriageError::VectorSchemaMismatch {
                rendered: vector.len(),
                expected: self.mean.len(),
            });
        }

        Ok(vector
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let scale = self.scale.get(i).copied().unwrap_or(1.0);
                // zero-variance training columns divide by 1 instead
                let scale = if scale.abs() < f32::EPSILON { 1.0 } else { scale };
                (value - self.mean[i]) / scale
            })
            .collect())
    }
}

/// On-disk description of the trained pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// Schema version the model was trained against.
    pub schema_version: u8,
    /// Layout hash of that schema.
    pub schema_hash: u32,
    /// ONNX model file name, relative to the artifact directory.
    pub model_file: String,
    pub scaler: ScalerParams,
    /// Class index to family name, in model output order.
    pub labels: Vec<String>,
}

impl ArtifactManifest {
    /// Read and sanity-check pipeline.json from the artifact directory.
    /// Does not touch the ONNX model; callers cross-check the schema
    /// pairing before building the session.
    pub fn load(model_dir: &Path) -> Result<Self, TriageError> {
        let manifest_path = model_dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            TriageError::ArtifactUnavailable(format!(
                "manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;
        let manifest: ArtifactManifest = serde_json::from_str(&raw).map_err(|e| {
            TriageError::ArtifactUnavailable(format!(
                "manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;

        if manifest.scaler.mean.len() != manifest.scaler.scale.len() {
            return Err(TriageError::ArtifactUnavailable(format!(
                "scaler mean/scale length mismatch: {} vs {}",
                manifest.scaler.mean.len(),
                manifest.scaler.scale.len()
            )));
        }
        if manifest.labels.is_empty() {
            return Err(TriageError::ArtifactUnavailable(
                "label decoder is empty".to_string(),
            ));
        }

        Ok(manifest)
    }
}

pub struct ClassifierArtifact {
    pub manifest: ArtifactManifest,
    session: Mutex<Session>,
}

impl ClassifierArtifact {
    /// Build the ONNX session for an already validated manifest.
    pub fn load(manifest: ArtifactManifest, model_dir: &Path) -> Result<Self, TriageError> {
        let model_path = model_dir.join(&manifest.model_file);
        log::info!("loading ONNX model from {}", model_path.display());
        let session = Session::builder()
            .map_err(|e| artifact_error("session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| artifact_error("optimization level", e))?
            .commit_from_file(&model_path)
            .map_err(|e| artifact_error("model load", e))?;

        Ok(Self {
            manifest,
            session: Mutex::new(session),
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.manifest.labels
    }

    pub fn scaler(&self) -> &ScalerParams {
        &self.manifest.scaler
    }

    /// Run the model on one scaled vector and return the per-class
    /// probability row. Exported sklearn pipelines emit the class label
    /// first and the probability tensor after it, so outputs are tried
    /// back to front for the first float tensor.
    pub fn predict_probabilities(&self, scaled: &[f32]) -> Result<Vec<f32>, TriageError> {
        let input_array = Array2::<f32>::from_shape_vec((1, scaled.len()), scaled.to_vec())
            .map_err(|e| TriageError::PredictionFailed(format!("input tensor: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| TriageError::PredictionFailed(format!("input tensor: {}", e)))?;

        let mut session = self.session.lock();
        let output_names: Vec<String> =
            session.outputs.iter().map(|o| o.name.clone()).collect();

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| TriageError::PredictionFailed(format!("inference failed: {}", e)))?;

        for name in output_names.iter().rev() {
            if let Some(output) = outputs.get(name) {
                if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                    return Ok(tensor.1.to_vec());
                }
            }
        }

        Err(TriageError::PredictionFailed(
            "model produced no float probability output".to_string(),
        ))
    }
}

fn artifact_error(stage: &str, e: ort::Error) -> TriageError {
    TriageError::ArtifactUnavailable(format!("{}: {}", stage, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_transform_standardizes() {
        let scaler = ScalerParams {
            mean: vec![1.0, 2.0, 0.0],
            scale: vec![2.0, 1.0, 0.5],
        };
        let scaled = scaler.transform(&[3.0, 2.0, 1.0]).unwrap();
        assert_eq!(scaled, vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_scaler_refuses_wrong_dimensionality() {
        let scaler = ScalerParams {
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            TriageError::VectorSchemaMismatch {
                rendered: 2,
                expected: 5
            }
        ));
    }

    #[test]
    fn test_scaler_guards_zero_variance_columns() {
        let scaler = ScalerParams {
            mean: vec![1.0],
            scale: vec![0.0],
        };
        let scaled = scaler.transform(&[4.0]).unwrap();
        assert_eq!(scaled, vec![3.0]);
    }

    #[test]
    fn test_manifest_parses_from_json() {
        let raw = r#"{
            "schema_version": 1,
            "schema_hash": 305419896,
            "model_file": "model.onnx",
            "scaler": {"mean": [0.0, 1.0], "scale": [1.0, 2.0]},
            "labels": ["trojan", "ransomware", "benign"]
        }"#;
        let manifest: ArtifactManifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.schema_hash, 0x12345678);
        assert_eq!(manifest.labels.len(), 3);
        assert_eq!(manifest.scaler.dim(), 2);
    }

    #[test]
    fn test_load_missing_manifest_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, TriageError::ArtifactUnavailable(_)));
    }

    #[test]
    fn test_load_rejects_mismatched_scaler_lengths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{
                "schema_version": 1,
                "schema_hash": 1,
                "model_file": "model.onnx",
                "scaler": {"mean": [0.0, 0.0], "scale": [1.0]},
                "labels": ["benign"]
            }"#,
        )
        .unwrap();
        let err = ArtifactManifest::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("mean/scale"));
    }

    #[test]
    fn test_load_rejects_empty_labels() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{
                "schema_version": 1,
                "schema_hash": 1,
                "model_file": "model.onnx",
                "scaler": {"mean": [0.0], "scale": [1.0]},
                "labels": []
            }"#,
        )
        .unwrap();
        let err = ArtifactManifest::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("label decoder"));
    }
}
