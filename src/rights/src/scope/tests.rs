//! Test suite for scope resolution
//!
//! Tests cover:
//! - Precedence by declaration order
//! - Anchored and substring matching
//! - Wildcard resources and actions
//! - Custom scope bindings

use super::*;
use crate::rule::MatchMode;
use serde_json::json;
use std::collections::HashMap;

fn compile(rules: &[&str], mode: MatchMode) -> RightsTable {
    RightsTable::compile(rules.iter().copied(), &HashMap::new(), mode).unwrap()
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
fn test_earliest_rule_wins_over_more_specific_later_rule() {
    let table = compile(&["users.*.me", "users.read.all"], MatchMode::Anchored);
    assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::Me));
}

#[test]
fn test_later_rule_used_when_earlier_does_not_match() {
    let table = compile(&["users.read.me", "users.*.any"], MatchMode::Anchored);
    assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::Me));
    assert_eq!(table.resolve("update", "users"), Some(&ScopeKind::Any));
}

#[test]
fn test_resolution_is_repeatable() {
    let table = compile(&["posts.*.me", "*.read.all"], MatchMode::Anchored);
    for _ in 0..10 {
        assert_eq!(table.resolve("read", "posts"), Some(&ScopeKind::Me));
        assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::All));
        assert_eq!(table.resolve("write", "users"), None);
    }
}

// ============================================================================
// Anchoring Tests
// ============================================================================

#[test]
fn test_anchored_resource_is_exact() {
    let table = compile(&["user.read.all"], MatchMode::Anchored);
    assert_eq!(table.resolve("read", "user"), Some(&ScopeKind::All));
    assert_eq!(table.resolve("read", "superuser"), None);
    assert_eq!(table.resolve("read", "users"), None);
}

#[test]
fn test_substring_resource_matches_inside() {
    let table = compile(&["user.read.all"], MatchMode::Substring);
    assert_eq!(table.resolve("read", "superuser"), Some(&ScopeKind::All));
    assert_eq!(table.resolve("read", "users"), Some(&ScopeKind::All));
    assert_eq!(table.resolve("reread", "user"), Some(&ScopeKind::All));
}

#[test]
fn test_mode_recorded_on_table() {
    assert_eq!(compile(&[], MatchMode::Substring).mode(), MatchMode::Substring);
    assert_eq!(compile(&[], MatchMode::Anchored).mode(), MatchMode::Anchored);
}

// ============================================================================
// Wildcard Tests
// ============================================================================

#[test]
fn test_wildcard_action() {
    let table = compile(&["reports.export_*.all"], MatchMode::Anchored);
    assert_eq!(table.resolve("export_csv", "reports"), Some(&ScopeKind::All));
    assert_eq!(table.resolve("export_", "reports"), Some(&ScopeKind::All));
    assert_eq!(table.resolve("import_csv", "reports"), None);
}

#[test]
fn test_full_wildcard_rule() {
    let table = compile(&["*.*.*"], MatchMode::Anchored);
    for (action, resource) in [("read", "users"), ("", ""), ("x.y", "z.w")] {
        assert_eq!(table.resolve(action, resource), Some(&ScopeKind::All));
    }
}

// ============================================================================
// Custom Scope Tests
// ============================================================================

#[test]
fn test_bound_custom_scope_resolves_to_custom_handler() {
    let mut data = HashMap::new();
    data.insert("posts".to_string(), json!({"ownerId": 42}));

    let table = RightsTable::compile(["posts.*.?"], &data, MatchMode::Anchored).unwrap();
    let right = table.find("update", "posts").unwrap();

    assert_eq!(right.scope(), &ScopeKind::Custom(CUSTOM_SCOPE.to_string()));
    assert_eq!(data.get(right.scope_data_key("posts")), Some(&json!({"ownerId": 42})));
}

#[test]
fn test_bound_custom_scope_missing_data() {
    let mut data = HashMap::new();
    data.insert("users".to_string(), json!(1));

    let result = RightsTable::compile(["posts.*.?"], &data, MatchMode::Anchored);
    assert!(result.unwrap_err().is_configuration());
}
