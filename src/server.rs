use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handlers;
use crate::loader;
use crate::protocol::{HealthResponse, WebhookResponse};
use crate::store::ContactStore;

pub const WEBHOOK_PATH: &str = "/retell-webhook";
pub const HEALTH_PATH: &str = "/health";

/// State shared by every request: the loaded store and the process start.
///
/// The store sits behind an `Arc` and is never mutated once serving starts,
/// so handlers read it without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<ContactStore>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: ContactStore, started_at: Instant) -> Self {
        Self {
            store: Arc::new(store),
            started_at,
        }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }
}

/// Build the HTTP routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(retell_webhook))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// HTTP server answering Retell webhooks from a preloaded contact store.
pub struct WebhookServer {
    listener: TcpListener,
    state: AppState,
}

impl WebhookServer {
    /// Load contacts from `config.source`, then bind `config.bind_addr`.
    ///
    /// The listener is opened only after the store is fully built; a load
    /// failure returns before any socket exists.
    pub async fn start(config: &ServerConfig, started_at: Instant) -> Result<Self, ServerError> {
        let source = config.source.clone();
        let (store, _stats) = tokio::task::spawn_blocking(move || loader::load_path(&source)).await??;
        let state = AppState::new(store, started_at);

        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: config.bind_addr,
                source: e,
            })?;

        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain open connections.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr().map_err(ServerError::Serve)?;
        let port = addr.port();

        tracing::info!(%addr, "retell webhook server listening");
        tracing::info!("webhook URL: http://localhost:{port}{WEBHOOK_PATH}");
        tracing::info!("health URL: http://localhost:{port}{HEALTH_PATH}");
        tracing::info!(entries = self.state.store().len(), "phone entries indexed");

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn retell_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let payload = parse_payload(&body);
    let response = handlers::webhook::handle(&payload, state.store());
    (StatusCode::OK, Json(response))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = handlers::health::handle(state.store(), state.started_at);
    (StatusCode::OK, Json(response))
}

/// Decode a webhook body; an empty or malformed body becomes `{}`.
fn parse_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Default::default());
    }
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "webhook body is not valid JSON");
            Value::Object(Default::default())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
