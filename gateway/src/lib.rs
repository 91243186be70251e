// Library for the booking gateway: router, settings and run loop.
// The binary entrypoint lives in src/main.rs.

use std::{fs, net::SocketAddr, path::Path};

use axum::{
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use backend::BackendClient;
use client::RoomClient;
use common_net::{
    metrics::{self, gateway_metrics, METRICS_PATH},
    shutdown,
};
use tokio::sync::oneshot;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod proxy;

pub use proxy::ProxyState;

pub type BoxError = common_net::BoxError;

pub const HEALTHZ_PATH: &str = "/healthz";
pub const VERSION_PATH: &str = "/version";
pub const BOOKING_PATH: &str = "/api/booking";
pub const BOOKING_STATUS_PATH: &str = "/api/bookings/:id/status";
pub const ROOMS_PATH: &str = "/api/rooms";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct GatewaySettings {
    pub bind_addr: SocketAddr,
    /// Root of the external booking API, e.g. `https://bookings.example.com/api`.
    pub base_url: String,
}

impl GatewaySettings {
    pub fn from_env() -> Result<Self, BoxError> {
        let bind_addr: SocketAddr = std::env::var("GATEWAY_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| Box::new(e) as BoxError)?;
        let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            bind_addr,
            base_url,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, BoxError> {
        let raw = fs::read_to_string(path).map_err(|err| Box::new(err) as BoxError)?;
        let settings = serde_json::from_str(&raw).map_err(|err| Box::new(err) as BoxError)?;
        Ok(settings)
    }

    pub fn into_config(self) -> GatewayConfig {
        GatewayConfig::from_settings(self)
    }
}

#[derive(Debug)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub base_url: String,
    /// Receives the bound address once the listener is up.
    pub ready_tx: Option<oneshot::Sender<SocketAddr>>,
}

impl GatewayConfig {
    pub fn from_settings(s: GatewaySettings) -> Self {
        Self {
            bind_addr: s.bind_addr,
            base_url: s.base_url,
            ready_tx: None,
        }
    }

    pub fn from_env() -> Result<Self, BoxError> {
        GatewaySettings::from_env().map(Self::from_settings)
    }
}

pub fn build_router(base_url: &str) -> Router {
    let state = ProxyState {
        backend: BackendClient::new(base_url),
        rooms: RoomClient::new(base_url),
    };

    gateway_metrics().on_startup(&[
        HEALTHZ_PATH,
        VERSION_PATH,
        METRICS_PATH,
        BOOKING_PATH,
        BOOKING_STATUS_PATH,
        ROOMS_PATH,
    ]);

    Router::new()
        .route(HEALTHZ_PATH, get(healthz))
        .route(VERSION_PATH, get(version))
        .route(METRICS_PATH, get(metrics_endpoint))
        .route(
            BOOKING_PATH,
            get(proxy::list_bookings).post(proxy::create_booking),
        )
        .route(BOOKING_STATUS_PATH, patch(proxy::update_booking_status))
        .route(ROOMS_PATH, get(proxy::list_rooms))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> impl IntoResponse {
    gateway_metrics().inc_request(HEALTHZ_PATH);
    axum::http::StatusCode::OK
}

async fn version() -> impl IntoResponse {
    gateway_metrics().inc_request(VERSION_PATH);
    Json(serde_json::json!({
        "name": "gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics_endpoint() -> impl IntoResponse {
    gateway_metrics().inc_request(METRICS_PATH);
    metrics::metrics_handler().await
}

pub async fn run_with_ctrl_c(config: GatewayConfig) -> Result<(), BoxError> {
    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let ctrl_c = shutdown::on_ctrl_c(shutdown_tx, "gateway");

    let result = run(config, shutdown_rx).await;

    ctrl_c.abort();
    result
}

/// Serves until `shutdown_rx` fires, then drains in-flight requests.
pub async fn run(
    config: GatewayConfig,
    shutdown_rx: shutdown::ShutdownReceiver,
) -> Result<(), BoxError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| Box::new(e) as BoxError)?;
    let local_addr = listener.local_addr().map_err(|e| Box::new(e) as BoxError)?;
    if let Some(tx) = config.ready_tx {
        let _ = tx.send(local_addr);
    }

    let app = build_router(&config.base_url);
    info!(%local_addr, base_url = %config.base_url, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait(shutdown_rx))
        .await
        .map_err(|e| Box::new(e) as BoxError)?;

    info!("gateway stopped");
    Ok(())
}
