//! Raw HTTP seam between the API client and the network.
//!
//! Client-side (hydrate): `GlooTransport` issues real requests via `gloo-net`.
//! Everywhere else: `OfflineTransport` fails every request, mirroring how the
//! browser-only endpoints behave during server rendering.

#![allow(async_fn_in_trait)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

/// HTTP method subset used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully resolved outbound request.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
    /// Bearer credential attached as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn post_json(url: String, body: serde_json::Value) -> Self {
        Self { method: Method::Post, url, body: Some(body), bearer: None }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Status and raw body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not available on server")]
    Unavailable,
}

/// Sends requests on behalf of `ApiClient`.
pub trait Transport {
    /// Send one request and return whatever status the server produced.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` only when no HTTP response was obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport used outside the browser; every request fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let _ = request;
        Err(TransportError::Unavailable)
    }
}

/// Browser `fetch` transport.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::{Request, RequestBuilder};

        let mut builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &bearer_header(token));
        }
        let resp = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| TransportError::Request(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// The transport the app wires in for the current build target.
#[cfg(feature = "hydrate")]
pub type DefaultTransport = GlooTransport;
#[cfg(not(feature = "hydrate"))]
pub type DefaultTransport = OfflineTransport;

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}
