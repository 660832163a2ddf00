//! Client configuration.
//!
//! The library state of a client: where the API lives, which version and
//! format to request, and how many results a search page holds. Every field
//! has a default, so `{}` is a valid document. Field types validate
//! themselves on deserialization, so a loaded `ClientConfig` is always usable.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ApiVersion, Format, PageSize};

pub const DEFAULT_BASE_URL: &str = "http://open-staging.nysenate.gov/legislation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the legislation service, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub version: ApiVersion,

    /// Response format; `object` maps XML responses into bills.
    #[serde(default)]
    pub format: Format,

    /// Results per search page (1–99).
    #[serde(default)]
    pub page_size: PageSize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: ApiVersion::default(),
            format: Format::default(),
            page_size: PageSize::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Document(e.to_string()))
    }
}
