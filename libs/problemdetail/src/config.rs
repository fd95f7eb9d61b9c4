//! Configuration of the problem detail layer.
//!
//! Lives in the `problem_details` section of the application config:
//!
//! ```yaml
//! problem_details:
//!   media_subtype: json
//!   modules:
//!     shop::billing:
//!       to: billing-audit
//!       at: warning
//! ```
//!
//! Environment variables prefixed with `APP__` override the file, with `__`
//! separating nesting levels (`APP__PROBLEM_DETAILS__MEDIA_SUBTYPE=xml`).

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

use crate::logging::{LoggingConfig, set_module_logging};

/// Config section name.
pub const SECTION: &str = "problem_details";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "APP__";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid '{SECTION}' config: {0}")]
    Invalid(#[source] Box<figment::Error>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProblemDetailsConfig {
    /// Wire format subtype announced as `application/problem+<subtype>`.
    #[serde(default = "default_media_subtype")]
    pub media_subtype: String,
    /// Module-wide logging declarations keyed by module path.
    #[serde(default)]
    pub modules: BTreeMap<String, LoggingConfig>,
}

fn default_media_subtype() -> String {
    "json".to_owned()
}

impl Default for ProblemDetailsConfig {
    fn default() -> Self {
        Self {
            media_subtype: default_media_subtype(),
            modules: BTreeMap::new(),
        }
    }
}

impl ProblemDetailsConfig {
    /// Extracts the `problem_details` section; a missing section yields defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the section cannot be deserialized.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        if !figment.contains(SECTION) {
            return Ok(Self::default());
        }
        figment
            .extract_inner(SECTION)
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Loads the section from a YAML file overlaid with `APP__` environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the merged section is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Makes the configured module declarations visible to policy resolution.
    pub fn install(&self) {
        for (module, logging) in &self.modules {
            tracing::debug!(module = %module, to = %logging.to, at = ?logging.at, "installing module logging policy");
            set_module_logging(module.clone(), logging.clone());
        }
    }
}
