//! # Rights Probe
//!
//! Resolves the scope a role is granted for an (action, resource) pair.
//!
//! ```text
//! rights-probe --config roles.toml --role editor read posts
//! rights-probe --role system delete users
//! rights-probe --role author --data posts='{"ownerId":42}' update posts
//! ```
//!
//! Prints the granted scope and exits with an error when nothing matches.

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use cretoai_rights::{RightsConfig, RoleRegistry, SYSTEM_ROLE};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

/// Rights probe CLI
#[derive(Parser)]
#[command(name = "rights-probe")]
#[command(about = "Resolve the scope granted to a role for an action on a resource")]
#[command(version)]
struct Cli {
    /// Path to a rights configuration file
    #[arg(short, long, env = "RIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Role to mint the context for
    #[arg(short, long, default_value = SYSTEM_ROLE)]
    role: String,

    /// Custom scope data as resource=JSON, repeatable
    #[arg(short, long = "data", value_parser = parse_scope_data)]
    data: Vec<(String, Value)>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Action to check
    action: String,

    /// Resource to check
    resource: String,
}

fn parse_scope_data(raw: &str) -> std::result::Result<(String, Value), String> {
    let (resource, json) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected resource=JSON, got '{}'", raw))?;
    let value = serde_json::from_str(json).map_err(|e| format!("invalid JSON for '{}': {}", resource, e))?;
    Ok((resource.to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},cretoai_rights={}", log_level, log_level).into()),
        )
        .with_target(true)
        .init();

    let registry = match &cli.config {
        Some(path) => {
            let config = RightsConfig::load(path)
                .with_context(|| format!("Failed to load rights configuration {:?}", path))?;
            RoleRegistry::from_config(&config).context("Invalid rights configuration")?
        }
        None => RoleRegistry::new(),
    };

    let custom_scope_data: HashMap<String, Value> = cli.data.into_iter().collect();
    let ctx = registry
        .context_for_role_with(&cli.role, custom_scope_data, HashMap::new())
        .with_context(|| format!("Cannot build context for role '{}'", cli.role))?;

    info!("Probing role '{}' with {} rights", cli.role, ctx.rights().len());

    match ctx.can_query(&cli.action, &cli.resource) {
        Some(scope) => {
            println!("{}", scope);
            Ok(())
        }
        None => bail!(
            "role '{}' cannot {} {}",
            cli.role,
            cli.action,
            cli.resource
        ),
    }
}
