//! Classifier Adapter - schema-bound family classification
//!
//! Owns the loaded schema/artifact pair and the degraded mode. Loading
//! failures are absorbed at startup: the context stays usable and every
//! classification answers with a sentinel instead of panicking, so the
//! rest of the pipeline (behaviors, reports) keeps working without a
//! model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{FAMILY_MODEL_UNAVAILABLE, FAMILY_PREDICTION_ERROR};
use crate::logic::config::TriageConfig;
use crate::logic::errors::TriageError;
use crate::logic::features::{FeatureBag, FeatureSchema, VectorBuilder};
use super::artifact::{ArtifactManifest, ClassifierArtifact};

/// How a classification answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Model,
    Degraded,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Model => "model",
            ClassificationMethod::Degraded => "degraded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub family: String,
    /// Winning class probability, 0.0 for degraded answers.
    pub confidence: f32,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    fn degraded(family: &str) -> Self {
        Self {
            family: family.to_string(),
            confidence: 0.0,
            method: ClassificationMethod::Degraded,
        }
    }
}

enum ContextState {
    Ready {
        schema: FeatureSchema,
        artifact: ClassifierArtifact,
    },
    Degraded {
        reason: String,
    },
}

pub struct ClassifierContext {
    state: ContextState,
}

impl ClassifierContext {
    /// Load the schema and artifact pair. Any failure yields a degraded
    /// context, never an error.
    pub fn load(config: &TriageConfig) -> Self {
        match Self::try_load(config) {
            Ok(context) => context,
            Err(e) => {
                log::warn!("entering degraded classification mode: {}", e);
                Self {
                    state: ContextState::Degraded {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    fn try_load(config: &TriageConfig) -> Result<Self, TriageError> {
        let schema = FeatureSchema::load(&config.schema_path())?;
        let manifest = ArtifactManifest::load(&config.model_dir)?;

        // the schema and the model are only valid as the trained pair;
        // this must hold before any session is built
        if !schema.matches(manifest.schema_version, manifest.schema_hash) {
            return Err(TriageError::ArtifactUnavailable(format!(
                "schema v{} (hash {:08x}) is not the pairing recorded in the manifest (v{}, hash {:08x})",
                schema.version,
                schema.layout_hash(),
                manifest.schema_version,
                manifest.schema_hash
            )));
        }
        if manifest.scaler.dim() != schema.vector_len() {
            return Err(TriageError::ArtifactUnavailable(format!(
                "scaler dimensionality {} does not cover the schema vector length {}",
                manifest.scaler.dim(),
                schema.vector_len()
            )));
        }

        let artifact = ClassifierArtifact::load(manifest, &config.model_dir)?;
        log::info!(
            "classifier ready: {} schema tokens, {} families",
            schema.len(),
            artifact.labels().len()
        );
        Ok(Self {
            state: ContextState::Ready { schema, artifact },
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ContextState::Ready { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.state {
            ContextState::Degraded { reason } => Some(reason),
            ContextState::Ready { .. } => None,
        }
    }

    /// Classify one sample. Degraded context or failed prediction both
    /// answer with a sentinel family at zero confidence.
    pub fn classify(&self, bag: &FeatureBag, path: &Path) -> ClassificationResult {
        let (schema, artifact) = match &self.state {
            ContextState::Ready { schema, artifact } => (schema, artifact),
            ContextState::Degraded { .. } => {
                return ClassificationResult::degraded(FAMILY_MODEL_UNAVAILABLE)
            }
        };

        match predict(schema, artifact, bag, path) {
            Ok(result) => result,
            Err(e @ TriageError::VectorSchemaMismatch { .. }) => {
                // stale pairing slipped past load-time checks; make it loud
                log::error!("{}", e);
                ClassificationResult::degraded(FAMILY_PREDICTION_ERROR)
            }
            Err(e) => {
                log::warn!("prediction failed for {}: {}", path.display(), e);
                ClassificationResult::degraded(FAMILY_PREDICTION_ERROR)
            }
        }
    }

    pub fn predict_family(&self, bag: &FeatureBag, path: &Path) -> String {
        self.classify(bag, path).family
    }

    pub fn predict_confidence(&self, bag: &FeatureBag, path: &Path) -> f32 {
        self.classify(bag, path).confidence
    }
}

fn predict(
    schema: &FeatureSchema,
    artifact: &ClassifierArtifact,
    bag: &FeatureBag,
    path: &Path,
) -> Result<ClassificationResult, TriageError> {
    let vector = VectorBuilder::new(schema).render(bag, path);
    let scaled = artifact.scaler().transform(&vector)?;
    let probabilities = artifact.predict_probabilities(&scaled)?;

    let (index, confidence) = argmax(&probabilities).ok_or_else(|| {
        TriageError::PredictionFailed("empty probability output".to_string())
    })?;
    let family = artifact.labels().get(index).cloned().ok_or_else(|| {
        TriageError::PredictionFailed(format!(
            "class index {} outside the label decoder ({} labels)",
            index,
            artifact.labels().len()
        ))
    })?;

    Ok(ClassificationResult {
        family,
        confidence: confidence.clamp(0.0, 1.0),
        method: ClassificationMethod::Model,
    })
}

fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn degraded_context() -> ClassifierContext {
        // empty directory: no schema, no manifest
        let dir = tempfile::tempdir().unwrap();
        let config = TriageConfig::resolve(Some(dir.path().to_path_buf()), None);
        ClassifierContext::load(&config)
    }

    #[test]
    fn test_missing_artifacts_degrade_instead_of_failing() {
        let context = degraded_context();
        assert!(!context.is_ready());
        assert!(context.degraded_reason().is_some());
    }

    #[test]
    fn test_degraded_classification_is_sentinel_at_zero_confidence() {
        let context = degraded_context();
        let result = context.classify(&FeatureBag::new(), &PathBuf::from("sample.bin"));
        assert_eq!(result.family, FAMILY_MODEL_UNAVAILABLE);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, ClassificationMethod::Degraded);
    }

    #[test]
    fn test_pairing_mismatch_degrades_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::constants::SCHEMA_FILE),
            r#"{"version": 1, "tokens": ["HTTP", "eval"]}"#,
        )
        .unwrap();
        // hash 0 never matches a real schema
        std::fs::write(
            dir.path().join(crate::constants::MANIFEST_FILE),
            r#"{
                "schema_version": 1,
                "schema_hash": 0,
                "model_file": "model.onnx",
                "scaler": {"mean": [0.0], "scale": [1.0]},
                "labels": ["benign"]
            }"#,
        )
        .unwrap();

        let config = TriageConfig::resolve(Some(dir.path().to_path_buf()), None);
        let context = ClassifierContext::load(&config);
        assert!(!context.is_ready());
        let reason = context.degraded_reason().unwrap();
        assert!(reason.contains("pairing"), "got {:?}", reason);
    }

    #[test]
    fn test_argmax_picks_first_of_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5, 0.1]), Some((1, 0.5)));
        assert_eq!(argmax(&[]), None);
    }
}
