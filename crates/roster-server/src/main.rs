#![deny(clippy::unwrap_used)]

use roster_server::{bootstrap, cli, runtime, settings};

#[tokio::main]
async fn main() {
    let cli = cli::parse_args();
    runtime::init_tracing();
    let settings = settings::Settings::from_cli(&cli);
    bootstrap::log_startup(&settings);
    bootstrap::init_metrics_registry(&settings.config.metrics);

    let pool = match bootstrap::connect_db(&settings) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(event = "db_dsn_invalid", error = %err, "create service failed");
            std::process::exit(1);
        }
    };

    let state = bootstrap::build_state(bootstrap::user_store(pool.clone())).await;
    bootstrap::start_background_tasks(&settings, &pool);
    let app = bootstrap::build_app(&settings.config.metrics, state);
    bootstrap::serve(&settings, app).await;

    tracing::info!(event = "server_stopped", "Server stopped");
}
