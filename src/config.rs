use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApsError;

/// Data-centre region for region-scoped endpoints. Travels as the
/// `x-ads-region` header, never as a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Us,
    Emea,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Emea => "EMEA",
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "https://developer.api.autodesk.com";

/// Resolver configuration, threaded explicitly into every request builder so
/// the builders stay pure and testable without ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApsConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Region applied to region-scoped requests unless the per-operation
    /// options override it.
    pub default_region: Region,
}

impl Default for ApsConfig {
    fn default() -> Self {
        ApsConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_region: Region::Us,
        }
    }
}

impl ApsConfig {
    /// Build a config from the environment (`APS_BASE_URL`, `APS_REGION`),
    /// falling back to production defaults. Loads `.env` if present.
    pub fn from_env() -> Result<Self, ApsError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("APS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let default_region = match std::env::var("APS_REGION") {
            Ok(raw) => match raw.to_uppercase().as_str() {
                "US" => Region::Us,
                "EMEA" => Region::Emea,
                other => {
                    return Err(ApsError::Configuration(format!(
                        "APS_REGION must be US or EMEA, got '{other}'"
                    )))
                }
            },
            Err(_) => Region::Us,
        };
        Ok(ApsConfig {
            base_url,
            default_region,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            region = self.default_region.as_str(),
            "Loaded ApsConfig"
        );
        debug!(?self, "ApsConfig loaded (full debug)");
    }
}
