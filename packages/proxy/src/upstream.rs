//! Upstream HTTP client.
//!
//! Forwards request bodies to the legacy pages and the voucher reload API
//! with the headers each expects, and hands the raw response back.

use idss_proxy_models::{EndpointDefinition, Upstream};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER,
};

use crate::ProxyError;
use crate::config::ProxyConfig;

/// Raw upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Body decoded as text.
    pub body: String,
}

impl UpstreamResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Client for all configured upstreams.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    config: ProxyConfig,
}

impl UpstreamClient {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Headers sent to the upstream for `endpoint`.
    ///
    /// Legacy pages only answer requests that look like they came from their
    /// own forms, so they get browser-like `Origin`/`Referer` headers.
    #[must_use]
    pub fn headers_for(&self, endpoint: &EndpointDefinition) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match endpoint.upstream {
            Upstream::Legacy => {
                let base = self.config.base_url(Upstream::Legacy);
                headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
                headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.6"));
                headers.insert(
                    HeaderName::from_static("sec-gpc"),
                    HeaderValue::from_static("1"),
                );
                if let Ok(origin) = HeaderValue::from_str(base.trim_end_matches('/')) {
                    headers.insert(ORIGIN, origin);
                }
                if let Some(referer) = endpoint
                    .referer_url(base)
                    .and_then(|r| HeaderValue::from_str(&r).ok())
                {
                    headers.insert(REFERER, referer);
                }
            }
            Upstream::Ibas => {
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            }
        }

        headers
    }

    /// POSTs `body` to the upstream behind `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the request fails, times out, or the
    /// body cannot be read.
    pub async fn forward(
        &self,
        endpoint: &EndpointDefinition,
        body: Vec<u8>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let url = endpoint.url(self.config.base_url(endpoint.upstream));
        log::info!("[{}] POST {url} ({} bytes)", endpoint.id, body.len());

        let response = self
            .client
            .post(&url)
            .headers(self.headers_for(endpoint))
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        log::info!(
            "[{}] upstream answered {status}, {} bytes",
            endpoint.id,
            body.len()
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    /// Serializes `payload` as JSON and forwards it.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Json`] if the payload cannot be serialized, or
    /// any error from [`Self::forward`].
    pub async fn forward_json(
        &self,
        endpoint: &EndpointDefinition,
        payload: &impl serde::Serialize,
    ) -> Result<UpstreamResponse, ProxyError> {
        let body = serde_json::to_vec(payload)?;
        self.forward(endpoint, body).await
    }
}
