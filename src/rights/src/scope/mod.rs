//! Scope resolution
//!
//! Holds the scope kinds a right can grant and the rights table that maps an
//! (action, resource) pair to the scope of its first matching right.
//!
//! # Examples
//!
//! ```
//! use cretoai_rights::scope::{RightsTable, ScopeKind};
//!
//! let table = RightsTable::unrestricted();
//! assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::All));
//! ```

mod types;
mod resolver;

#[cfg(test)]
mod tests;

pub use types::{ScopeKind, CUSTOM_SCOPE};
pub use resolver::RightsTable;
