//! Rights configuration loading and validation
//!
//! ```toml
//! match_mode = "anchored"
//!
//! [roles]
//! editor = ["posts.*.all", "users.read.me"]
//! author = ["posts.update.?"]
//! ```

use crate::error::{RightsError, Result};
use crate::rule::{validate_rule, MatchMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Role presets and matching behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RightsConfig {
    /// How rule patterns are applied to resources and actions
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Role name to rights list
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

impl RightsConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;

        info!("Loaded rights configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            RightsError::Configuration(format!("Failed to parse rights configuration: {}", e))
        })
    }

    /// Validate every role's rules
    pub fn validate(&self) -> Result<()> {
        for (role, rights) in &self.roles {
            if role.is_empty() {
                return Err(RightsError::Configuration(
                    "Role name cannot be empty".to_string(),
                ));
            }

            for rule in rights {
                validate_rule(rule).map_err(|e| {
                    RightsError::Configuration(format!("Role '{}': {}", role, e))
                })?;
            }
        }

        Ok(())
    }
}
