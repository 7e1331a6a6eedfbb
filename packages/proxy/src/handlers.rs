//! HTTP handler functions for the proxy API.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use idss_proxy_models::registry::{all_endpoints, find_endpoint};
use idss_proxy_models::{ApiEndpoint, ApiError, ApiHealth, EndpointDefinition};

use crate::upstream::UpstreamResponse;
use crate::{AppState, ProxyError, extraction};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/endpoints`
///
/// Lists the registered upstream endpoints.
pub async fn endpoints() -> HttpResponse {
    let list: Vec<ApiEndpoint> = all_endpoints().iter().map(ApiEndpoint::from).collect();
    HttpResponse::Ok().json(list)
}

/// `POST /api/{endpoint}`
///
/// Relays the request body to the upstream and the upstream body back.
pub async fn forward(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let endpoint = match lookup(&path) {
        Ok(endpoint) => endpoint,
        Err(response) => return response,
    };

    match state.upstream.forward(&endpoint, body.to_vec()).await {
        Ok(upstream) => relay(upstream),
        Err(e) => upstream_failure(&endpoint, &e),
    }
}

/// `POST /api/{endpoint}/extract`
///
/// Relays the request, then returns the endpoint's structured extraction.
/// Endpoints without an extraction behave like [`forward`].
pub async fn forward_extract(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let endpoint = match lookup(&path) {
        Ok(endpoint) => endpoint,
        Err(response) => return response,
    };

    let upstream = match state.upstream.forward(&endpoint, body.to_vec()).await {
        Ok(upstream) => upstream,
        Err(e) => return upstream_failure(&endpoint, &e),
    };

    if !upstream.is_success() {
        let e = ProxyError::UpstreamStatus {
            status: upstream.status,
        };
        log::error!("[{}] {e}", endpoint.id);
        return HttpResponse::BadGateway().json(ApiError::new(e));
    }

    match extraction::apply(&endpoint.extraction, &upstream.body) {
        Ok(Some(result)) => HttpResponse::Ok().json(result),
        Ok(None) => relay(upstream),
        Err(e) => {
            log::error!("[{}] extraction failed: {e}", endpoint.id);
            HttpResponse::InternalServerError().json(ApiError::new(e))
        }
    }
}

fn lookup(id: &str) -> Result<EndpointDefinition, HttpResponse> {
    find_endpoint(id).ok_or_else(|| {
        log::warn!("Request for unknown endpoint '{id}'");
        HttpResponse::NotFound().json(ApiError::new(ProxyError::UnknownEndpoint(id.to_owned())))
    })
}

fn relay(upstream: UpstreamResponse) -> HttpResponse {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = HttpResponse::build(status);
    if let Some(content_type) = upstream.content_type {
        response.content_type(content_type);
    }
    response.body(upstream.body)
}

fn upstream_failure(endpoint: &EndpointDefinition, error: &ProxyError) -> HttpResponse {
    log::error!("[{}] proxy error: {error}", endpoint.id);
    HttpResponse::InternalServerError().json(ApiError::new(error))
}
