//! Named role presets
//!
//! A [`RoleRegistry`] maps role names to rights lists and mints a fresh
//! [`Context`] per request from them. It is populated during process start,
//! before requests are served, and read afterwards; writes take a
//! `parking_lot::RwLock` so late registration stays safe.
//!
//! Built-in roles:
//! - `system`: `*.*.*`
//! - `anonymous`: no rights

use crate::config::RightsConfig;
use crate::context::{Context, UNRESTRICTED_RULE};
use crate::error::{RightsError, Result};
use crate::rule::{validate_rule, MatchMode};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Role with full access
pub const SYSTEM_ROLE: &str = "system";

/// Role with no access
pub const ANONYMOUS_ROLE: &str = "anonymous";

static GLOBAL: OnceLock<RoleRegistry> = OnceLock::new();

/// Registry of named rights lists
///
/// # Examples
///
/// ```
/// use cretoai_rights::{RoleRegistry, ScopeKind};
///
/// let registry = RoleRegistry::new();
/// registry.set_role("reader", ["*.read.*"]).unwrap();
///
/// let ctx = registry.context_for_role("reader").unwrap();
/// assert_eq!(ctx.can_query("read", "posts"), Some(ScopeKind::All));
/// assert_eq!(ctx.can_query("write", "posts"), None);
/// ```
#[derive(Debug)]
pub struct RoleRegistry {
    roles: RwLock<HashMap<String, Vec<String>>>,
    match_mode: MatchMode,
}

impl RoleRegistry {
    /// Registry holding the built-in roles
    pub fn new() -> Self {
        Self::with_match_mode(MatchMode::default())
    }

    /// Registry holding the built-in roles, minting contexts with `mode`
    pub fn with_match_mode(match_mode: MatchMode) -> Self {
        let mut roles = HashMap::new();
        roles.insert(SYSTEM_ROLE.to_string(), vec![UNRESTRICTED_RULE.to_string()]);
        roles.insert(ANONYMOUS_ROLE.to_string(), Vec::new());

        Self {
            roles: RwLock::new(roles),
            match_mode,
        }
    }

    /// Registry built from configuration
    ///
    /// Configured roles are added on top of the built-in ones and may
    /// override them.
    pub fn from_config(config: &RightsConfig) -> Result<Self> {
        config.validate()?;

        let registry = Self::with_match_mode(config.match_mode);
        {
            let mut roles = registry.roles.write();
            for (name, rights) in &config.roles {
                roles.insert(name.clone(), rights.clone());
            }
        }

        info!(
            "Role registry loaded: {} roles, {} matching",
            registry.roles.read().len(),
            registry.match_mode
        );

        Ok(registry)
    }

    /// Process-wide registry, created with the built-in roles on first use
    pub fn global() -> &'static RoleRegistry {
        GLOBAL.get_or_init(RoleRegistry::new)
    }

    /// Define or replace a role
    ///
    /// # Errors
    ///
    /// Returns `RightsError::Configuration` if a rule is malformed. Custom
    /// scope data bindings are checked when a context is minted.
    pub fn set_role<I, S>(&self, name: impl Into<String>, rights: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let rights: Vec<String> = rights.into_iter().map(|r| r.as_ref().to_string()).collect();
        for rule in &rights {
            validate_rule(rule)?;
        }

        info!("Role '{}' set with {} rights", name, rights.len());
        self.roles.write().insert(name, rights);
        Ok(())
    }

    /// Fresh context for a role
    ///
    /// # Errors
    ///
    /// Returns `RightsError::RoleNotFound` if the role is undefined.
    pub fn context_for_role(&self, name: &str) -> Result<Context> {
        self.context_for_role_with(name, HashMap::new(), HashMap::new())
    }

    /// Fresh context for a role, carrying request specific scope data and metadata
    pub fn context_for_role_with(
        &self,
        name: &str,
        custom_scope_data: HashMap<String, Value>,
        metadata: HashMap<String, Value>,
    ) -> Result<Context> {
        let rights = self
            .rights_for(name)
            .ok_or_else(|| RightsError::RoleNotFound(name.to_string()))?;

        debug!("Minting context for role '{}'", name);

        Context::builder()
            .rights(rights)
            .custom_scope_data_map(custom_scope_data)
            .metadata_map(metadata)
            .match_mode(self.match_mode)
            .build()
    }

    /// Rights list of a role
    pub fn rights_for(&self, name: &str) -> Option<Vec<String>> {
        self.roles.read().get(name).cloned()
    }

    /// Whether a role is defined
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.read().contains_key(name)
    }

    /// Defined role names, sorted
    pub fn roles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Match mode used for minted contexts
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
