//! Rule compilation
//!
//! Turns `resource.action.scope` rule strings into [`Right`]s. The resource
//! and action segments become [`Pattern`]s, the scope segment a
//! [`ScopeKind`](crate::scope::ScopeKind).

mod pattern;
mod right;

pub use pattern::{MatchMode, Pattern};
pub use right::{validate_rule, Right};
