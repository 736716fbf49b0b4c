//! Service config loader (strict parsing).
//!
//! Resolution order: `OTELNOTE_CONFIG` path, then `otelnote.yaml` in the
//! working directory, then built-in defaults. `OTEL_ENDPOINT` always wins
//! over `telemetry.endpoint`.

pub mod schema;

use std::fs;
use std::path::Path;

use otelnote_core::error::{NoteError, Result};

pub use schema::{ServerSection, ServiceConfig, StorageBackend, StorageSection, TelemetrySection};

pub const CONFIG_PATH_ENV: &str = "OTELNOTE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "otelnote.yaml";
pub const OTEL_ENDPOINT_ENV: &str = "OTEL_ENDPOINT";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| NoteError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| NoteError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config for the binary, applying environment overrides.
pub fn load() -> Result<ServiceConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            tracing::info!("no config file found, using defaults");
            ServiceConfig::default()
        }
    };
    apply_endpoint_override(&mut cfg, std::env::var(OTEL_ENDPOINT_ENV).ok());
    cfg.validate()?;
    Ok(cfg)
}

/// Replace the collector endpoint when the override is set and non-blank.
pub fn apply_endpoint_override(cfg: &mut ServiceConfig, endpoint: Option<String>) {
    if let Some(ep) = endpoint.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        tracing::debug!(endpoint = %ep, "collector endpoint taken from {OTEL_ENDPOINT_ENV}");
        cfg.telemetry.endpoint = ep;
    }
}
