//! # CretoAI Rights Engine
//!
//! Decides whether an already authenticated identity may perform an action on
//! a resource, and which scope of data the action may touch.
//!
//! ## Features
//!
//! - **Rule compilation** of `resource.action.scope` strings with `*` wildcards
//! - **First-match precedence**: the earliest declared matching rule wins
//! - **Scoped dispatch**: callers register one handler per scope (`all`,
//!   `any`, `me`, named custom scopes, fallback) and exactly one runs
//! - **Checked flag** recording that an authorization decision was attempted
//! - **Role registry** minting contexts from named rights presets
//!
//! ## Example
//!
//! ```rust
//! use cretoai_rights::{Context, RightsError};
//! use serde_json::json;
//!
//! fn main() -> Result<(), RightsError> {
//!     let ctx = Context::builder()
//!         .rights(["posts.read.all", "posts.*.?"])
//!         .custom_scope_data("posts", json!({"ownerId": 42}))
//!         .build()?;
//!
//!     let filter = ctx.can_enforce("update", "posts", |h| {
//!         h.all(|| Ok(String::new()))
//!             .custom("custom", |data| {
//!                 let owner = data.map(|d| d["ownerId"].clone()).unwrap_or_default();
//!                 Ok(format!("owner_id = {}", owner))
//!             });
//!     })?;
//!
//!     assert_eq!(filter, "owner_id = 42");
//!     assert!(ctx.is_checked());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod roles;
pub mod rule;
pub mod scope;

// Re-export commonly used types
pub use config::RightsConfig;
pub use context::{Context, ContextBuilder, UNRESTRICTED_RULE};
pub use dispatch::Handlers;
pub use error::{Result, RightsError};
pub use roles::{RoleRegistry, ANONYMOUS_ROLE, SYSTEM_ROLE};
pub use rule::{MatchMode, Pattern, Right};
pub use scope::{RightsTable, ScopeKind, CUSTOM_SCOPE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
