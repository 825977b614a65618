//! Authorization context for one identity
//!
//! A [`Context`] owns the compiled rights of an already authenticated
//! identity, the custom scope data its custom handlers consume, and free-form
//! metadata. It answers two kinds of questions:
//!
//! - [`Context::can_query`]: a side-effect free probe returning the granted scope
//! - [`Context::can_enforce`]: an enforcement point that runs the caller's
//!   handler for the granted scope, or fails with `RightsError::Unauthorized`
//!
//! Every enforcement attempt sets the context's checked flag, so middleware
//! and tests can assert that a sensitive operation went through the engine.
//!
//! # Thread Safety
//!
//! The rights table and scope data never change after construction, so
//! `can_query` may be called from many threads at once. The checked flag is
//! atomic, but a context is meant to serve a single request or task.

use crate::dispatch::{Handlers, Selection};
use crate::error::{RightsError, Result};
use crate::rule::{MatchMode, Right};
use crate::scope::{RightsTable, ScopeKind};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Rule granting everything, used when no rights are given
pub const UNRESTRICTED_RULE: &str = "*.*.*";

/// Authorization decision context
///
/// # Examples
///
/// ```
/// use cretoai_rights::{Context, ScopeKind};
///
/// let ctx = Context::builder()
///     .rights(["users.read.me", "posts.*.all"])
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.can_query("read", "users"), Some(ScopeKind::Me));
///
/// let filter = ctx
///     .can_enforce("read", "users", |h| {
///         h.all(|| Ok("1 = 1".to_string()))
///             .me(|| Ok("owner_id = 7".to_string()));
///     })
///     .unwrap();
///
/// assert_eq!(filter, "owner_id = 7");
/// assert!(ctx.is_checked());
/// ```
#[derive(Debug)]
pub struct Context {
    table: RightsTable,
    custom_scope_data: HashMap<String, Value>,
    metadata: HashMap<String, Value>,
    checked: AtomicBool,
}

impl Context {
    /// Create a context from rule strings, custom scope data and metadata
    ///
    /// # Errors
    ///
    /// Returns `RightsError::Configuration` on any malformed rule or invalid
    /// custom scope binding.
    pub fn new<I, S>(
        rights: I,
        custom_scope_data: HashMap<String, Value>,
        metadata: HashMap<String, Value>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder()
            .rights(rights)
            .custom_scope_data_map(custom_scope_data)
            .metadata_map(metadata)
            .build()
    }

    /// Start building a context
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Scope granted for the (action, resource) pair
    ///
    /// Never fails and never touches the checked flag.
    pub fn can_query(&self, action: &str, resource: &str) -> Option<ScopeKind> {
        self.table.resolve(action, resource).cloned()
    }

    /// Run the handler registered for the scope granted on (action, resource)
    ///
    /// `register` receives an empty [`Handlers`] set and registers one handler
    /// per scope it supports, plus an optional `otherwise` fallback. Exactly
    /// one handler runs:
    /// 1. the handler for the resolved scope, if registered
    /// 2. otherwise the fallback, if registered (also used when nothing matched)
    /// 3. otherwise the call fails with `RightsError::Unauthorized`
    ///
    /// The checked flag is set before resolution, so a failed call still
    /// counts as an attempted check.
    ///
    /// # Errors
    ///
    /// - `RightsError::Unauthorized` when no handler applies
    /// - `RightsError::DuplicateHandler` when a scope was registered twice
    /// - whatever error the selected handler returns
    pub fn can_enforce<'h, T, F>(&self, action: &str, resource: &str, register: F) -> Result<T>
    where
        F: FnOnce(&mut Handlers<'h, T>),
    {
        self.checked.store(true, Ordering::SeqCst);

        let right = self.table.find(action, resource);
        let scope = right.map(Right::scope);

        debug!(
            "Enforcing rights: action={}, resource={}, scope={:?}",
            action, resource, scope
        );

        let mut handlers = Handlers::new();
        register(&mut handlers);
        handlers.ensure_unique()?;

        let data = match right {
            Some(right) if right.scope().takes_scope_data() => {
                self.custom_scope_data.get(right.scope_data_key(resource))
            }
            _ => None,
        };

        match handlers.select(scope, data) {
            Selection::Handled(result) => result,
            Selection::Unhandled => {
                warn!(
                    "No handler for scope {:?}: action={}, resource={}",
                    scope, action, resource
                );
                Err(RightsError::unauthorized(action, resource))
            }
        }
    }

    /// Always fails with `RightsError::Unauthorized`
    pub fn reject<T>(&self) -> Result<T> {
        warn!("Request rejected");
        Err(RightsError::Unauthorized("request rejected".to_string()))
    }

    /// Record that authorization was handled for this context
    pub fn mark_as_checked(&self) -> &Self {
        self.checked.store(true, Ordering::SeqCst);
        self
    }

    /// Declare that this context's operation needs no authorization
    pub fn skip_authorization(&self) -> &Self {
        debug!("Authorization explicitly skipped");
        self.mark_as_checked()
    }

    /// Whether a check was attempted or the context was marked as checked
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    /// Fail with `RightsError::Unchecked` unless a check was attempted
    pub fn ensure_checked(&self) -> Result<()> {
        if self.is_checked() {
            Ok(())
        } else {
            Err(RightsError::Unchecked)
        }
    }

    /// Custom scope data for a resource
    pub fn custom_scope_data(&self, resource: &str) -> Option<&Value> {
        self.custom_scope_data.get(resource)
    }

    /// Metadata passed at construction
    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    /// Single metadata value
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Compiled rights in precedence order
    pub fn rights(&self) -> &RightsTable {
        &self.table
    }
}

impl Default for Context {
    /// Unrestricted context (`*.*.*`)
    fn default() -> Self {
        Self {
            table: RightsTable::unrestricted(),
            custom_scope_data: HashMap::new(),
            metadata: HashMap::new(),
            checked: AtomicBool::new(false),
        }
    }
}

/// Builder for [`Context`]
///
/// Rights default to the unrestricted rule `*.*.*` when never set; an
/// explicitly empty list grants nothing.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    rights: Option<Vec<String>>,
    custom_scope_data: HashMap<String, Value>,
    metadata: HashMap<String, Value>,
    match_mode: MatchMode,
}

impl ContextBuilder {
    /// Rule strings, in precedence order
    pub fn rights<I, S>(mut self, rights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rights = Some(rights.into_iter().map(|r| r.as_ref().to_string()).collect());
        self
    }

    /// Custom scope data for one resource
    pub fn custom_scope_data(mut self, resource: impl Into<String>, data: Value) -> Self {
        self.custom_scope_data.insert(resource.into(), data);
        self
    }

    /// Replace all custom scope data
    pub fn custom_scope_data_map(mut self, data: HashMap<String, Value>) -> Self {
        self.custom_scope_data = data;
        self
    }

    /// One metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Replace all metadata
    pub fn metadata_map(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// How resource and action patterns match
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Compile the rights and create the context
    pub fn build(self) -> Result<Context> {
        let rights = self
            .rights
            .unwrap_or_else(|| vec![UNRESTRICTED_RULE.to_string()]);
        let table = RightsTable::compile(&rights, &self.custom_scope_data, self.match_mode)?;

        Ok(Context {
            table,
            custom_scope_data: self.custom_scope_data,
            metadata: self.metadata,
            checked: AtomicBool::new(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults_to_unrestricted() {
        let ctx = Context::builder().build().unwrap();
        assert_eq!(ctx.rights().len(), 1);
        assert_eq!(ctx.can_query("drop", "everything"), Some(ScopeKind::All));
    }

    #[test]
    fn test_explicit_empty_rights_grant_nothing() {
        let ctx = Context::builder().rights(Vec::<String>::new()).build().unwrap();
        assert!(ctx.rights().is_empty());
        assert_eq!(ctx.can_query("read", "users"), None);
    }

    #[test]
    fn test_default_context() {
        let ctx = Context::default();
        assert!(!ctx.is_checked());
        assert_eq!(ctx.can_query("read", "users"), Some(ScopeKind::All));
    }

    #[test]
    fn test_can_query_leaves_flag_untouched() {
        let ctx = Context::default();
        ctx.can_query("read", "users");
        ctx.can_query("write", "posts");
        assert!(!ctx.is_checked());
    }

    #[test]
    fn test_mark_as_checked_chains() {
        let ctx = Context::default();
        assert!(ctx.mark_as_checked().is_checked());
        assert!(ctx.ensure_checked().is_ok());
    }

    #[test]
    fn test_ensure_checked_fails_on_fresh_context() {
        let ctx = Context::default();
        assert!(matches!(ctx.ensure_checked(), Err(RightsError::Unchecked)));
        ctx.skip_authorization();
        assert!(ctx.ensure_checked().is_ok());
    }

    #[test]
    fn test_duplicate_handler_fails_before_running() {
        let ctx = Context::default();
        let mut ran = false;
        let result: Result<i32> = ctx.can_enforce("read", "users", |h| {
            h.all(|| {
                ran = true;
                Ok(1)
            })
            .all(|| Ok(2));
        });

        assert!(matches!(result, Err(RightsError::DuplicateHandler(ref s)) if s == "all"));
        assert!(!ran);
        assert!(ctx.is_checked());
    }

    #[test]
    fn test_handler_may_reject() {
        let ctx = Context::builder().rights(["users.*.me"]).build().unwrap();
        let result: Result<()> = ctx.can_enforce("read", "users", |h| {
            h.me(|| ctx.reject());
        });
        assert!(result.unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_metadata_passthrough() {
        let ctx = Context::builder()
            .metadata("request_id", json!("req-1"))
            .build()
            .unwrap();
        assert_eq!(ctx.meta("request_id"), Some(&json!("req-1")));
        assert_eq!(ctx.metadata().len(), 1);
        assert!(ctx.meta("missing").is_none());
    }
}
