use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::SentinelConfig;
use crate::error::SentinelError;

/// Oversized bodies are rejected with a bare 413, either by the limit layer
/// or by the body extractor; answer them in the JSON envelope instead
async fn envelope_payload_too_large(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SentinelError::PayloadTooLarge.into_response()
    } else {
        response
    }
}

/// The full application: API routes plus CORS, tracing and body limits
pub fn app(state: AppState, body_limit_kb: u32) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", api::router(state))
        .layer(RequestBodyLimitLayer::new(body_limit_kb as usize * 1024))
        .layer(middleware::map_response(envelope_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(feature = "tls")]
async fn serve_tls(
    addr: SocketAddr,
    app: Router,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS material from {}", cert.display()))?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    tracing::info!("SentinelX listening on https://{addr}");
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| "HTTPS server error")
}

pub async fn run(config: &SentinelConfig, state: AppState) -> Result<()> {
    let bind = config.bind_address();
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address {bind}"))?;
    let server = &config.server;
    let app = app(state, server.body_limit_kb);

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (&server.tls_cert_path, &server.tls_key_path) {
        return serve_tls(addr, app, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("SentinelX listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "HTTP server error")?;
    Ok(())
}
