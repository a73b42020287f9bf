use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerRuntimeConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

pub const DEFAULT_SHUTDOWN_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_METRICS_ENDPOINT: &str = "/metrics";

/// Paths already served by the router; the metrics endpoint may not shadow them.
const RESERVED_PATHS: [&str; 4] = ["/", "/healthz", "/user/count", "/user/random"];

/// A metrics endpoint must be a plain absolute path that no other route claims.
pub fn is_valid_metrics_endpoint(endpoint: &str) -> bool {
    if !endpoint.starts_with('/') || endpoint.contains("//") {
        return false;
    }
    if endpoint.contains(|c: char| c == ':' || c == '*' || c.is_whitespace()) {
        return false;
    }
    let normalized = endpoint.trim_end_matches('/');
    if normalized.is_empty() || RESERVED_PATHS.contains(&normalized) {
        return false;
    }
    !normalized.starts_with("/healthz/")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRuntimeConfig {
    #[serde(default = "default_shutdown_timeout_seconds")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_seconds: default_shutdown_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(default = "default_pool_max")]
    pub pool_max: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            pool_max: default_pool_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_shutdown_timeout_seconds() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECONDS
}

fn default_pool_max() -> u32 {
    roster_db::DEFAULT_POOL_MAX
}

fn default_true() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    DEFAULT_METRICS_ENDPOINT.to_string()
}
