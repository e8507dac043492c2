//! Runtime Configuration - artifact and report locations
//!
//! Resolution order for every path: explicit CLI flag, environment
//! variable, platform default. Built once in main and passed by
//! reference; nothing here is global state.

use std::path::PathBuf;

use crate::constants::{self, SCHEMA_FILE};

#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Directory holding the ONNX model, pipeline manifest and schema.
    pub model_dir: PathBuf,
    /// Directory JSON reports are written into (created on demand).
    pub reports_dir: PathBuf,
}

impl TriageConfig {
    pub fn resolve(model_dir: Option<PathBuf>, reports_dir: Option<PathBuf>) -> Self {
        let model_dir = model_dir
            .or_else(|| constants::get_model_dir_override().map(PathBuf::from))
            .unwrap_or_else(default_model_dir);

        let reports_dir = reports_dir
            .or_else(|| constants::get_reports_dir_override().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("reports"));

        Self {
            model_dir,
            reports_dir,
        }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.model_dir.join(SCHEMA_FILE)
    }
}

fn default_model_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maltriage")
        .join("models")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let config = TriageConfig::resolve(
            Some(PathBuf::from("/opt/models")),
            Some(PathBuf::from("/tmp/out")),
        );
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_schema_path_is_under_model_dir() {
        let config = TriageConfig::resolve(Some(PathBuf::from("/opt/models")), None);
        assert_eq!(
            config.schema_path(),
            PathBuf::from("/opt/models").join(SCHEMA_FILE)
        );
    }
}
