//! Neon Hunt Back binary entrypoint wiring REST, WebSocket, detector, and
//! score persistence layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neon_hunt_back::{
    config::AppConfig,
    dao::score_store::{ScoreStore, json_file},
    detect::ObjectDetector,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let score_store = build_score_store();
    let detector = build_detector()?;
    let app_state = AppState::new(config, score_store, detector);

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(5002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the JSON file score store, honoring the `SCORE_DB_PATH` override.
fn build_score_store() -> Arc<dyn ScoreStore> {
    let path =
        env::var("SCORE_DB_PATH").unwrap_or_else(|_| json_file::DEFAULT_PATH.into());
    info!(%path, "persisting scores to JSON file");
    Arc::new(json_file::JsonFileStore::new(path))
}

/// Build the detector backend compiled into this binary.
#[cfg(feature = "http-detector")]
fn build_detector() -> anyhow::Result<Arc<dyn ObjectDetector>> {
    use neon_hunt_back::detect::http::{DEFAULT_ENDPOINT, HttpDetector};

    let endpoint = env::var("DETECTOR_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.into());
    info!(%endpoint, "using HTTP detector backend");
    Ok(Arc::new(HttpDetector::new(endpoint)))
}

#[cfg(not(feature = "http-detector"))]
fn build_detector() -> anyhow::Result<Arc<dyn ObjectDetector>> {
    anyhow::bail!("no detector backend compiled in; enable the `http-detector` feature")
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
