use std::time::Instant;

use retell_lookup_server::config::ServerConfig;
use retell_lookup_server::server::WebhookServer;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let started_at = Instant::now();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        csv_file = %config.source.path.display(),
        bind = %config.bind_addr,
        name_column = %config.source.columns.name,
        account_column = %config.source.columns.account,
        phone_columns = ?config.source.columns.phones,
        "loaded configuration"
    );

    // The listener is bound only after the contact file has fully loaded
    let server = match WebhookServer::start(&config, started_at).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(line = ?e.line(), "startup failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("fatal server error: {e}");
        std::process::exit(1);
    }
}
