//! Central Configuration Constants
//!
//! Single source of truth for tunable defaults.
//! To change an extraction bound or artifact file name, only edit this file.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "MalTriage";

/// Minimum length of a printable run kept by the string scanner
pub const MIN_STRING_LEN: usize = 4;

/// Cap on instructions emitted by the linear-sweep disassembler
pub const MAX_DISASM_INSTRUCTIONS: usize = 200;

/// Virtual base address handed to the disassembler
pub const DISASM_BASE_ADDR: u64 = 0x1000;

/// Maximum archive members analyzed per container
pub const MAX_ARCHIVE_MEMBERS: usize = 512;

/// Maximum nested-archive recursion depth
pub const MAX_ARCHIVE_DEPTH: usize = 3;

/// Cap on bytes inflated per archive member
pub const MAX_MEMBER_BYTES: u64 = 64 * 1024 * 1024;

/// Sentinel family when the classifier artifact never loaded
pub const FAMILY_MODEL_UNAVAILABLE: &str = "Unknown (model unavailable)";

/// Sentinel family when a single prediction failed
pub const FAMILY_PREDICTION_ERROR: &str = "Unknown (prediction error)";

/// Artifact manifest file name (scaler + labels + model reference)
pub const MANIFEST_FILE: &str = "pipeline.json";

/// Persisted feature schema file name
pub const SCHEMA_FILE: &str = "feature_schema.json";

/// MalwareBazaar API endpoint
pub const BAZAAR_API_URL: &str = "https://mb-api.abuse.ch/api/v1/";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the MalwareBazaar API key from environment (no default)
pub fn get_bazaar_api_key() -> Option<String> {
    std::env::var("MALTRIAGE_BAZAAR_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Get the model directory override from environment
pub fn get_model_dir_override() -> Option<String> {
    std::env::var("MALTRIAGE_MODEL_DIR")
        .ok()
        .filter(|d| !d.is_empty())
}

/// Get the reports directory override from environment
pub fn get_reports_dir_override() -> Option<String> {
    std::env::var("MALTRIAGE_REPORTS_DIR")
        .ok()
        .filter(|d| !d.is_empty())
}
