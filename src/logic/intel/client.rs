//! MalwareBazaar Client - labeled sample acquisition (blocking)
//!
//! Feeds the offline training side: pulls family-tagged hashes and the
//! samples behind them. The provider ships samples as password-protected
//! ZIPs; they are saved as received, never inflated here.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{self, BAZAAR_API_URL};

#[derive(Debug, Error)]
pub enum IntelError {
    #[error("MalwareBazaar API key not configured (set MALTRIAGE_BAZAAR_KEY)")]
    MissingApiKey,
    #[error("invalid MalwareBazaar API key")]
    InvalidApiKey,
    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("unexpected API response: {message}")]
    Api { message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One entry from a query response. The API returns much more; only
/// what the fetcher needs is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleInfo {
    pub sha256_hash: String,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Family signature assigned by the provider, when known.
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query_status: String,
    #[serde(default)]
    data: Vec<SampleInfo>,
}

pub struct BazaarClient {
    api_key: String,
    base_url: String,
}

impl BazaarClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: BAZAAR_API_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, IntelError> {
        constants::get_bazaar_api_key()
            .map(Self::new)
            .ok_or(IntelError::MissingApiKey)
    }

    fn query(&self, form: &[(&str, &str)]) -> Result<ApiResponse, IntelError> {
        let response = ureq::post(&self.base_url)
            .set("Auth-Key", &self.api_key)
            .send_form(form);

        let response = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(401, _)) => return Err(IntelError::InvalidApiKey),
            Err(ureq::Error::Status(429, _)) => {
                return Err(IntelError::RateLimited { retry_after: 60 })
            }
            Err(e) => {
                return Err(IntelError::Network {
                    message: e.to_string(),
                })
            }
        };

        let body = response.into_string().map_err(|e| IntelError::Network {
            message: e.to_string(),
        })?;
        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|e| IntelError::Api {
                message: e.to_string(),
            })?;

        if parsed.query_status != "ok" {
            return Err(IntelError::Api {
                message: format!("query_status {}", parsed.query_status),
            });
        }
        Ok(parsed)
    }

    /// Most recent submissions (provider-side one hour window).
    pub fn recent_samples(&self) -> Result<Vec<SampleInfo>, IntelError> {
        Ok(self
            .query(&[("query", "get_recent"), ("selector", "time")])?
            .data)
    }

    /// Hashes tagged with a family name, newest first, truncated to
    /// `limit`.
    pub fn samples_for_family(
        &self,
        family: &str,
        limit: usize,
    ) -> Result<Vec<SampleInfo>, IntelError> {
        let mut samples = self
            .query(&[("query", "get_taginfo"), ("tag", family)])?
            .data;
        samples.truncate(limit);
        Ok(samples)
    }

    /// Download one sample archive into `dest_dir`; returns the saved
    /// path (`<sha256>.zip`).
    pub fn download_sample(&self, sha256: &str, dest_dir: &Path) -> Result<PathBuf, IntelError> {
        let response = ureq::post(&self.base_url)
            .set("Auth-Key", &self.api_key)
            .send_form(&[("query", "get_file"), ("sha256_hash", sha256)]);

        let response = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(401, _)) => return Err(IntelError::InvalidApiKey),
            Err(ureq::Error::Status(429, _)) => {
                return Err(IntelError::RateLimited { retry_after: 60 })
            }
            Err(e) => {
                return Err(IntelError::Network {
                    message: e.to_string(),
                })
            }
        };

        let mut payload = Vec::new();
        response.into_reader().read_to_end(&mut payload)?;
        if payload.is_empty() {
            return Err(IntelError::Api {
                message: format!("empty payload for {}", sha256),
            });
        }

        fs::create_dir_all(dest_dir)?;
        let out_path = dest_dir.join(format!("{}.zip", sha256));
        fs::write(&out_path, &payload)?;
        Ok(out_path)
    }

    /// Fetch up to `limit` samples tagged `family` into `dest_dir`.
    /// Individual download failures are logged and skipped; returns the
    /// number actually saved.
    pub fn fetch_family(
        &self,
        family: &str,
        limit: usize,
        dest_dir: &Path,
    ) -> Result<usize, IntelError> {
        let samples = self.samples_for_family(family, limit)?;
        log::info!("{} tagged samples for '{}'", samples.len(), family);

        let mut downloaded = 0usize;
        for (index, sample) in samples.iter().enumerate() {
            match self.download_sample(&sample.sha256_hash, dest_dir) {
                Ok(path) => {
                    downloaded += 1;
                    log::info!(
                        "[{}/{}] saved {}",
                        index + 1,
                        samples.len(),
                        path.display()
                    );
                }
                Err(e) => log::warn!(
                    "[{}/{}] {} failed: {}",
                    index + 1,
                    samples.len(),
                    sample.sha256_hash,
                    e
                ),
            }
        }
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_keeps_needed_fields() {
        let raw = r#"{
            "query_status": "ok",
            "data": [
                {
                    "sha256_hash": "aa11",
                    "file_name": "invoice.exe",
                    "file_type": "exe",
                    "signature": "AgentTesla",
                    "tags": ["exe", "AgentTesla"]
                },
                {"sha256_hash": "bb22"}
            ]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.query_status, "ok");
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].signature.as_deref(), Some("AgentTesla"));
        assert!(parsed.data[1].file_name.is_none());
    }

    #[test]
    fn test_error_status_parses_without_data() {
        let raw = r#"{"query_status": "no_results"}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.query_status, "no_results");
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn test_missing_key_is_reported_as_such() {
        // guard against ambient configuration
        if constants::get_bazaar_api_key().is_none() {
            assert!(matches!(
                BazaarClient::from_env(),
                Err(IntelError::MissingApiKey)
            ));
        }
    }
}
