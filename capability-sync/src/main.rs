//! Capability Sync dry-run entry point.
//!
//! Usage: `capability-sync <entitlements.json> [remote-capabilities.json] [--broadcast-push]`
//!
//! Prints the update batch that would be submitted, without contacting the
//! portal.

use anyhow::Context;
use capability_sync::config::SyncConfig;
use capability_sync::models::{AdditionalOptions, EntitlementsMap, RemoteCapability};
use capability_sync::services::{init_metrics, plan};
use serde::de::DeserializeOwned;
use service_core::observability::init_tracing;

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path))
}

fn run(config: &SyncConfig, args: &[String]) -> anyhow::Result<()> {
    let broadcast = args.iter().any(|a| a == "--broadcast-push");
    let files: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let Some(entitlements_path) = files.first() else {
        anyhow::bail!(
            "usage: capability-sync <entitlements.json> [remote-capabilities.json] [--broadcast-push]"
        );
    };

    if !config.capability_sync_enabled {
        tracing::info!("Capability sync is disabled, nothing to plan");
        return Ok(());
    }

    let entitlements: EntitlementsMap = read_json(entitlements_path)?;
    let remote: Vec<RemoteCapability> = match files.get(1) {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let options = AdditionalOptions {
        uses_broadcast_push_notifications: broadcast,
    };

    let result = plan(&remote, &entitlements, &options)?;

    tracing::info!(
        enabled = result.enabled_names.len(),
        disabled = result.disabled_names.len(),
        "Planned capability sync"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn main() -> std::io::Result<()> {
    let config = SyncConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(&config.common.log_level, config.common.log_json);
    init_metrics();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        identifier_sync_enabled = config.identifier_sync_enabled,
        portal_edit_url = %config.portal_edit_url,
        "Starting capability-sync"
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    run(&config, &args).map_err(|e| {
        tracing::error!(error = %e, "Capability sync plan failed");
        std::io::Error::other(format!("{:#}", e))
    })
}
