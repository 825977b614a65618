//! Handler sets for scoped enforcement
//!
//! A caller registers at most one handler per scope kind for a single
//! [`Context::can_enforce`](crate::Context::can_enforce) call, plus an
//! optional fallback. After registration the handler matching the resolved
//! scope is selected and run; the others are dropped without being called.
//!
//! Handler shapes:
//! - `all`, `me`, `otherwise`: no arguments
//! - `any`, named custom handlers: the resource's custom scope data, if any

use crate::error::{RightsError, Result};
use crate::scope::ScopeKind;
use serde_json::Value;
use std::collections::HashMap;

type Handler<'h, T> = Box<dyn FnOnce() -> Result<T> + 'h>;
type DataHandler<'h, T> = Box<dyn FnOnce(Option<&Value>) -> Result<T> + 'h>;

/// Handlers registered for one enforcement call
///
/// Registering the same scope twice is recorded and reported as
/// `RightsError::DuplicateHandler` once registration finishes, before any
/// handler runs.
pub struct Handlers<'h, T> {
    all: Option<Handler<'h, T>>,
    any: Option<DataHandler<'h, T>>,
    me: Option<Handler<'h, T>>,
    custom: HashMap<String, DataHandler<'h, T>>,
    otherwise: Option<Handler<'h, T>>,
    duplicate: Option<String>,
}

/// Outcome of selecting a handler for a resolved scope
pub(crate) enum Selection<T> {
    /// A handler ran and produced this result
    Handled(Result<T>),
    /// Nothing registered for the scope and no fallback
    Unhandled,
}

impl<'h, T> Handlers<'h, T> {
    pub(crate) fn new() -> Self {
        Self {
            all: None,
            any: None,
            me: None,
            custom: HashMap::new(),
            otherwise: None,
            duplicate: None,
        }
    }

    /// Handler for the `all` scope
    pub fn all<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce() -> Result<T> + 'h,
    {
        if self.all.is_some() {
            self.record_duplicate("all");
        }
        self.all = Some(Box::new(handler));
        self
    }

    /// Handler for the `any` scope, receiving the resource's custom scope data
    pub fn any<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(Option<&Value>) -> Result<T> + 'h,
    {
        if self.any.is_some() {
            self.record_duplicate("any");
        }
        self.any = Some(Box::new(handler));
        self
    }

    /// Handler for the `me` scope
    pub fn me<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce() -> Result<T> + 'h,
    {
        if self.me.is_some() {
            self.record_duplicate("me");
        }
        self.me = Some(Box::new(handler));
        self
    }

    /// Handler for a named custom scope
    ///
    /// `?` rules dispatch to the handler named
    /// [`CUSTOM_SCOPE`](crate::scope::CUSTOM_SCOPE).
    pub fn custom<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnOnce(Option<&Value>) -> Result<T> + 'h,
    {
        let name = name.into();
        if self.custom.contains_key(&name) {
            self.record_duplicate(&name);
        }
        self.custom.insert(name, Box::new(handler));
        self
    }

    /// Fallback run when no handler serves the resolved scope, including no match
    pub fn otherwise<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce() -> Result<T> + 'h,
    {
        if self.otherwise.is_some() {
            self.record_duplicate("else");
        }
        self.otherwise = Some(Box::new(handler));
        self
    }

    /// Whether a handler is registered for the scope
    pub fn handles(&self, scope: &ScopeKind) -> bool {
        match scope {
            ScopeKind::All => self.all.is_some(),
            ScopeKind::Any => self.any.is_some(),
            ScopeKind::Me => self.me.is_some(),
            ScopeKind::Custom(name) => self.custom.contains_key(name),
        }
    }

    /// Number of registered handlers, fallback included
    pub fn len(&self) -> usize {
        [self.all.is_some(), self.any.is_some(), self.me.is_some(), self.otherwise.is_some()]
            .into_iter()
            .filter(|registered| *registered)
            .count()
            + self.custom.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First scope registered twice, if any
    pub(crate) fn duplicate(&self) -> Option<&str> {
        self.duplicate.as_deref()
    }

    /// Fail if any scope was registered twice
    pub(crate) fn ensure_unique(&self) -> Result<()> {
        match self.duplicate() {
            Some(name) => Err(RightsError::DuplicateHandler(name.to_string())),
            None => Ok(()),
        }
    }

    /// Run the handler serving `scope`, falling back to `otherwise`
    pub(crate) fn select(mut self, scope: Option<&ScopeKind>, data: Option<&Value>) -> Selection<T> {
        let handled = match scope {
            Some(ScopeKind::All) => self.all.take().map(|handler| handler()),
            Some(ScopeKind::Me) => self.me.take().map(|handler| handler()),
            Some(ScopeKind::Any) => self.any.take().map(|handler| handler(data)),
            Some(ScopeKind::Custom(name)) => self.custom.remove(name).map(|handler| handler(data)),
            None => None,
        };

        match handled.or_else(|| self.otherwise.take().map(|handler| handler())) {
            Some(result) => Selection::Handled(result),
            None => Selection::Unhandled,
        }
    }

    fn record_duplicate(&mut self, name: &str) {
        if self.duplicate.is_none() {
            self.duplicate = Some(name.to_string());
        }
    }
}

impl<T> Default for Handlers<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}
