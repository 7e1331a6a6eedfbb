#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web pass-through proxy for the back-office upstream endpoints.
//!
//! Browsers cannot call the legacy pages directly (no CORS, and the pages
//! check `Origin`/`Referer`), so every registered endpoint is exposed as
//! `POST /api/{endpoint}` and relayed verbatim. `POST /api/{endpoint}/extract`
//! additionally runs the endpoint's extraction and returns JSON.

pub mod config;
pub mod extraction;
mod handlers;
pub mod upstream;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use crate::config::ProxyConfig;
use crate::upstream::UpstreamClient;

/// Errors raised while proxying a request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The upstream request failed or timed out.
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A payload could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No endpoint is registered under the requested id.
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus {
        /// Status code returned by the upstream.
        status: u16,
    },

    /// Extraction configuration for the endpoint is invalid.
    #[error(transparent)]
    Extract(#[from] idss_extract::ExtractError),
}

/// Shared application state.
pub struct AppState {
    /// Client used for every upstream call.
    pub upstream: UpstreamClient,
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/endpoints", web::get().to(handlers::endpoints))
            .route("/{endpoint}", web::post().to(handlers::forward))
            .route("/{endpoint}/extract", web::post().to(handlers::forward_extract)),
    );
}

/// Starts the proxy server.
///
/// The caller is responsible for initializing logging and for providing
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the upstream client cannot be
/// built or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ProxyConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    log::info!(
        "Upstreams: legacy={} ibas={} (timeout {:?})",
        config.legacy_base_url,
        config.ibas_base_url,
        config.upstream_timeout
    );

    let upstream = UpstreamClient::new(config).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState { upstream });

    log::info!("Starting proxy on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
