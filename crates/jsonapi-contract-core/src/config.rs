//! # Contract Configuration
//!
//! The handful of literals the document checks compare against. Defaults
//! match the resources API: JSON:API version `"1.0"`, the three mandatory
//! `jsonapi.meta` members, and the legacy `_self` link key.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::load::{self, SourceFormat};

/// The JSON:API version every document must declare.
pub const JSONAPI_VERSION: &str = "1.0";

/// Placeholder left in test cases whose self link has not been written yet.
pub const SELF_LINK_PLACEHOLDER: &str = "TODO";

/// Members `jsonapi.meta` must carry as strings.
pub const REQUIRED_META: [&str; 3] = ["name", "source", "description"];

/// Literals the response contract checks compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractConfig {
    /// Required value of `jsonapi.version`.
    pub jsonapi_version: String,
    /// String members required in `jsonapi.meta`.
    pub required_meta: Vec<String>,
    /// Whether `links._self` is accepted when `links.self` is absent.
    pub accept_legacy_self_link: bool,
    /// Expected self link value rejected as an unfinished test case, in
    /// addition to [`SELF_LINK_PLACEHOLDER`], which is always rejected.
    pub self_link_placeholder: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            jsonapi_version: JSONAPI_VERSION.to_string(),
            required_meta: REQUIRED_META.iter().map(|s| s.to_string()).collect(),
            accept_legacy_self_link: true,
            self_link_placeholder: SELF_LINK_PLACEHOLDER.to_string(),
        }
    }
}

impl ContractConfig {
    /// Parse a configuration from YAML text. Missing fields take defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        load::parse(text, SourceFormat::Yaml, "input")
    }

    /// Parse a configuration from JSON text. Missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        load::parse(text, SourceFormat::Json, "input")
    }

    /// Load a configuration file, YAML or JSON by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (text, format) = load::read_source(path)?;
        let config: Self = load::parse(&text, format, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), version = %config.jsonapi_version, "loaded contract config");
        Ok(config)
    }
}
