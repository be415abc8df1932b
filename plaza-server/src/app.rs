use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::registry::{Registry, RegistryHandle};
use crate::signaling::{SignalingRouter, ws_handler};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every axum handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: RegistryHandle,
    pub router: SignalingRouter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Spawns the registry task; must be called inside a tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Registry::spawn(config.registry_queue);

        Self {
            router: SignalingRouter::new(registry.clone()),
            registry,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub participants: usize,
}

async fn health(State(state): State<AppState>) -> Response {
    match state.registry.len().await {
        Ok(participants) => Json(HealthReport {
            status: "ok",
            participants,
        })
        .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health));

    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bound listener plus the state it serves.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Binds `config.bind` and starts the registry. Port `0` picks a free port,
    /// see [`Server::local_addr`].
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind;
        let bind_err = |source| ServerError::Bind { addr, source };

        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        Ok(Self {
            listener,
            local_addr,
            state: AppState::new(config),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves until `shutdown` resolves, then lets open requests finish.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Plaza listening on http://{}", self.local_addr);

        let registry = self.state.registry.clone();
        let app = build_router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        let remaining = registry.len().await?;
        info!(remaining, "Plaza stopped");
        Ok(())
    }
}
