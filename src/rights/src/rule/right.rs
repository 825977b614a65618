//! Compilation of `resource.action.scope` rule strings

use super::pattern::{MatchMode, Pattern};
use crate::error::{RightsError, Result};
use crate::scope::{ScopeKind, CUSTOM_SCOPE};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Scope token that binds a rule to the resource's custom scope data
const BOUND_CUSTOM_TOKEN: &str = "?";

/// One compiled rule
///
/// Rights are only created by compiling a rule string and never change
/// afterwards. Their order inside a rights table is their precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Right {
    resource: Pattern,
    action: Pattern,
    scope: ScopeKind,
    /// Set for `?` rules, whose scope data is looked up under the rule's resource
    bound: bool,
}

impl Right {
    /// Compile a rule string
    ///
    /// # Errors
    ///
    /// Returns `RightsError::Configuration` if:
    /// - the rule does not have exactly three `.`-separated segments
    /// - a segment is empty
    /// - a `?` scope is declared on a wildcard resource
    /// - a `?` scope has no entry in `custom_scope_data` for its resource
    pub fn compile(
        rule: &str,
        custom_scope_data: &HashMap<String, Value>,
        mode: MatchMode,
    ) -> Result<Self> {
        let [resource, action, scope] = split_rule(rule)?;

        let bound = scope == BOUND_CUSTOM_TOKEN;
        if bound {
            check_custom_resource(rule, resource)?;
            if !custom_scope_data.contains_key(resource) {
                return Err(RightsError::Configuration(format!(
                    "Rule '{}' declares a custom scope but no custom scope data exists for '{}'",
                    rule, resource
                )));
            }
        }

        Ok(Self {
            resource: Pattern::compile(resource, mode),
            action: Pattern::compile(action, mode),
            scope: if bound {
                ScopeKind::Custom(CUSTOM_SCOPE.to_string())
            } else {
                ScopeKind::from_token(scope)
            },
            bound,
        })
    }

    /// Right granting every action on every resource (`*.*.*`)
    pub fn unrestricted() -> Self {
        Self {
            resource: Pattern::any(),
            action: Pattern::any(),
            scope: ScopeKind::All,
            bound: false,
        }
    }

    /// Whether this right applies to the (action, resource) pair
    pub fn matches(&self, action: &str, resource: &str) -> bool {
        self.resource.matches(resource) && self.action.matches(action)
    }

    /// Resource pattern
    pub fn resource(&self) -> &Pattern {
        &self.resource
    }

    /// Action pattern
    pub fn action(&self) -> &Pattern {
        &self.action
    }

    /// Scope granted when this right matches
    pub fn scope(&self) -> &ScopeKind {
        &self.scope
    }

    /// Key into the custom scope data for a request on `resource`
    pub fn scope_data_key<'a>(&'a self, resource: &'a str) -> &'a str {
        if self.bound {
            self.resource.as_str()
        } else {
            resource
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match &self.scope {
            _ if self.bound => BOUND_CUSTOM_TOKEN,
            ScopeKind::All => "*",
            other => other.handler_name(),
        };
        write!(f, "{}.{}.{}", self.resource, self.action, scope)
    }
}

/// Check a rule's shape without binding custom scope data
///
/// Used to validate role definitions, whose scope data is only known when a
/// context is minted for a request.
pub fn validate_rule(rule: &str) -> Result<()> {
    let [resource, _, scope] = split_rule(rule)?;
    if scope == BOUND_CUSTOM_TOKEN {
        check_custom_resource(rule, resource)?;
    }
    Ok(())
}

fn split_rule(rule: &str) -> Result<[&str; 3]> {
    let segments: Vec<&str> = rule.split('.').collect();
    let &[resource, action, scope] = segments.as_slice() else {
        return Err(RightsError::Configuration(format!(
            "Rule '{}' must have exactly three segments (resource.action.scope), found {}",
            rule,
            segments.len()
        )));
    };

    if resource.is_empty() || action.is_empty() || scope.is_empty() {
        return Err(RightsError::Configuration(format!(
            "Rule '{}' has an empty segment",
            rule
        )));
    }

    Ok([resource, action, scope])
}

fn check_custom_resource(rule: &str, resource: &str) -> Result<()> {
    if resource.contains('*') {
        return Err(RightsError::Configuration(format!(
            "Rule '{}' declares a custom scope on a wildcard resource",
            rule
        )));
    }
    Ok(())
}
