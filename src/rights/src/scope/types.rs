//! Scope kinds granted by a matching right

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handler name used by `?` rules
pub const CUSTOM_SCOPE: &str = "custom";

/// Breadth of access granted when a right matches
///
/// Scope tokens in the third rule segment map as follows:
/// - `*` or `all` → [`ScopeKind::All`]
/// - `any` → [`ScopeKind::Any`]
/// - `me` → [`ScopeKind::Me`]
/// - `?` → `Custom("custom")`, bound to the resource's custom scope data
/// - anything else → `Custom(token)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Every record of the resource
    All,
    /// A specific set of records, identified by the resource's scope data
    Any,
    /// Only records owned by the current identity
    Me,
    /// Application defined scope, dispatched to the handler of the same name
    Custom(String),
}

impl ScopeKind {
    /// Parse a scope token other than `?`
    pub fn from_token(token: &str) -> Self {
        match token {
            "*" | "all" => Self::All,
            "any" => Self::Any,
            "me" => Self::Me,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Name of the handler that serves this scope
    pub fn handler_name(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Any => "any",
            Self::Me => "me",
            Self::Custom(name) => name,
        }
    }

    /// Whether the handler for this scope receives custom scope data
    pub fn takes_scope_data(&self) -> bool {
        matches!(self, Self::Any | Self::Custom(_))
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handler_name())
    }
}
