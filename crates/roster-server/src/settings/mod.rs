use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::cli::Cli;
use crate::config::ServerConfig;

mod env_config;

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub dsn: String,
    pub db_pool_max: u32,
    pub shutdown_timeout: Duration,
    pub config: ServerConfig,
}

impl Settings {
    /// Flags pick the listener and DSN; everything else comes from the YAML
    /// file with `ROSTER_*` environment overrides on top.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = env_config::load_config(&cli.config);
        env_config::apply_server_env_overrides(&mut config);
        env_config::apply_db_env_overrides(&mut config);
        env_config::apply_metrics_env_overrides(&mut config);
        env_config::validate_metrics_endpoint(&mut config);
        Self::from_parts(cli.port, cli.dsn.clone(), config)
    }

    #[must_use]
    pub fn from_parts(port: u16, dsn: String, config: ServerConfig) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            dsn,
            db_pool_max: config.db.pool_max.max(1),
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout_seconds),
            config,
        }
    }
}
