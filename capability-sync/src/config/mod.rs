//! Configuration module for capability-sync.

use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_PORTAL_EDIT_URL: &str =
    "https://developer.apple.com/account/resources/identifiers/bundleId/edit";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub common: core_config::Config,
    /// Master switch. When off, sync returns without any portal call.
    pub capability_sync_enabled: bool,
    /// Whether the identifier pass runs before the capability update.
    pub identifier_sync_enabled: bool,
    /// Base of the portal page for editing an app identifier; the resource
    /// id is appended.
    pub portal_edit_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            capability_sync_enabled: true,
            identifier_sync_enabled: true,
            portal_edit_url: DEFAULT_PORTAL_EDIT_URL.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            capability_sync_enabled: env_flag("CAPABILITY_SYNC_ENABLED", true)?,
            identifier_sync_enabled: env_flag("CAPABILITY_IDENTIFIER_SYNC_ENABLED", true)?,
            portal_edit_url: env::var("PORTAL_BUNDLE_ID_EDIT_URL")
                .unwrap_or_else(|_| DEFAULT_PORTAL_EDIT_URL.to_string()),
        })
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool, AppError> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a boolean, got {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
