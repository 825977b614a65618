//! Rights table and first-match scope resolution
//!
//! The table is an ordered list of compiled rights, built once per context.
//! Resolution is a linear scan: rights tables hold tens of rules, so no index
//! is kept. The earliest declared right that matches wins.

use crate::error::Result;
use crate::rule::{MatchMode, Right};
use crate::scope::ScopeKind;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Ordered, immutable list of compiled rights
///
/// # Examples
///
/// ```
/// use cretoai_rights::{MatchMode, RightsTable, ScopeKind};
/// use std::collections::HashMap;
///
/// let table = RightsTable::compile(
///     ["users.read.me", "users.*.all"],
///     &HashMap::new(),
///     MatchMode::Anchored,
/// ).unwrap();
///
/// assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::Me));
/// assert_eq!(table.resolve("delete", "users"), Some(&ScopeKind::All));
/// assert_eq!(table.resolve("read", "posts"), None);
/// ```
#[derive(Debug, Clone)]
pub struct RightsTable {
    rights: Vec<Right>,
    mode: MatchMode,
}

impl RightsTable {
    /// Compile rule strings in order
    ///
    /// Fails on the first malformed rule or invalid custom scope binding.
    pub fn compile<I, S>(
        rules: I,
        custom_scope_data: &HashMap<String, Value>,
        mode: MatchMode,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rights = rules
            .into_iter()
            .map(|rule| Right::compile(rule.as_ref(), custom_scope_data, mode))
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled {} rights ({} matching)", rights.len(), mode);

        Ok(Self { rights, mode })
    }

    /// Table holding the single right `*.*.*`
    pub fn unrestricted() -> Self {
        Self {
            rights: vec![Right::unrestricted()],
            mode: MatchMode::default(),
        }
    }

    /// First right matching the (action, resource) pair
    pub fn find(&self, action: &str, resource: &str) -> Option<&Right> {
        self.rights.iter().find(|right| right.matches(action, resource))
    }

    /// Scope granted for the (action, resource) pair, or `None` if no right matches
    pub fn resolve(&self, action: &str, resource: &str) -> Option<&ScopeKind> {
        self.find(action, resource).map(Right::scope)
    }

    /// Rights in precedence order
    pub fn iter(&self) -> std::slice::Iter<'_, Right> {
        self.rights.iter()
    }

    /// Number of rights
    pub fn len(&self) -> usize {
        self.rights.len()
    }

    /// Whether the table grants nothing
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Match mode the rights were compiled with
    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl<'a> IntoIterator for &'a RightsTable {
    type Item = &'a Right;
    type IntoIter = std::slice::Iter<'a, Right>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
