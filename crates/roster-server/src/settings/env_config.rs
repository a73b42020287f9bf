use std::env;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::{is_valid_metrics_endpoint, ServerConfig, DEFAULT_METRICS_ENDPOINT};

pub(super) fn load_config(path: &Path) -> ServerConfig {
    if !path.exists() {
        return ServerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(event = "config_read_failed", path = %path.display(), error = %err);
            return ServerConfig::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(event = "config_parse_failed", path = %path.display(), error = %err);
            ServerConfig::default()
        }
    }
}

pub(super) fn apply_server_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("ROSTER_SHUTDOWN_TIMEOUT_SECONDS") {
        match value.trim().parse::<u64>() {
            Ok(seconds) => config.server.shutdown_timeout_seconds = seconds,
            Err(_) => warn!(
                event = "config_invalid",
                field = "ROSTER_SHUTDOWN_TIMEOUT_SECONDS",
                value = %value
            ),
        }
    }
}

pub(super) fn apply_db_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("ROSTER_DB_POOL_MAX") {
        match value.trim().parse::<u32>() {
            Ok(max) if max > 0 => config.db.pool_max = max,
            _ => warn!(event = "config_invalid", field = "ROSTER_DB_POOL_MAX", value = %value),
        }
    }
}

pub(super) fn apply_metrics_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("ROSTER_METRICS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.metrics.enabled = enabled;
        } else {
            warn!(event = "config_invalid", field = "ROSTER_METRICS_ENABLED", value = %value);
        }
    }
    if let Ok(value) = env::var("ROSTER_METRICS_ENDPOINT") {
        let trimmed = value.trim();
        if is_valid_metrics_endpoint(trimmed) {
            config.metrics.endpoint = trimmed.to_string();
        } else {
            warn!(event = "config_invalid", field = "ROSTER_METRICS_ENDPOINT", value = %value);
        }
    }
}

/// Resets an endpoint the router cannot mount to the default.
pub(super) fn validate_metrics_endpoint(config: &mut ServerConfig) {
    if !is_valid_metrics_endpoint(&config.metrics.endpoint) {
        warn!(
            event = "config_invalid",
            field = "metrics.endpoint",
            value = %config.metrics.endpoint
        );
        config.metrics.endpoint = DEFAULT_METRICS_ENDPOINT.to_string();
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
