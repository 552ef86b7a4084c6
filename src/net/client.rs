//! REST client for the ChirpNest backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call goes through `ApiClient`. Calls made on behalf of a
//! session (`query`) carry the bearer token and report a 401 to the
//! `UnauthorizedInterceptor`. The login and signup endpoints are called
//! without interception: a 401 there means bad credentials, which the login
//! form reports locally.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `ApiError` values instead of panics so fetch failures degrade
//! UI behavior without crashing hydration.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use super::types::{AuthResponse, LoginRequest, QueryRequest, RegisterRequest};
use crate::config::ClientConfig;
use crate::session::interceptor::UnauthorizedInterceptor;
use crate::session::store::SessionStore;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Unauthorized - Session expired")]
    Unauthorized,
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

pub struct ApiClient<T> {
    transport: T,
    config: Rc<ClientConfig>,
    store: Rc<SessionStore>,
    interceptor: Rc<UnauthorizedInterceptor>,
}

impl<T: Transport> ApiClient<T> {
    #[must_use]
    pub fn new(
        transport: T,
        config: Rc<ClientConfig>,
        store: Rc<SessionStore>,
        interceptor: Rc<UnauthorizedInterceptor>,
    ) -> Self {
        Self { transport, config, store, interceptor }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST {login}` with `{email, password}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an undecodable body.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = to_json(&LoginRequest { email, password })?;
        let url = self.config.build_api_url(&self.config.endpoints.login);
        let resp = self.transport.send(HttpRequest::post_json(url, body)).await?;
        parse_auth_response(&resp)
    }

    /// `POST {signup}` with `{email, password, username, fullName}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an undecodable body.
    pub async fn register(
        &self,
        full_name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = to_json(&RegisterRequest { email, password, username, full_name })?;
        let url = self.config.build_api_url(&self.config.endpoints.signup);
        let resp = self.transport.send(HttpRequest::post_json(url, body)).await?;
        parse_auth_response(&resp)
    }

    /// Run a natural-language query against the generic query endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` after triggering the hard logout when
    /// the backend answers 401, `ApiError::Status` for other non-2xx statuses.
    pub async fn query<R: DeserializeOwned>(&self, query: &str) -> Result<R, ApiError> {
        let body = to_json(&QueryRequest {
            query,
            db_url: &self.config.db_url,
            db_type: &self.config.db_type,
            refresh_schema: None,
        })?;
        let url = self.config.build_api_url(&self.config.endpoints.query);
        let resp = self.send_intercepted(HttpRequest::post_json(url, body)).await?;
        serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_intercepted(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let issued_epoch = self.store.epoch();
        let token = self.store.snapshot().token().map(str::to_owned);
        let resp = self.transport.send(request.with_bearer(token)).await?;
        if resp.is_unauthorized() {
            self.interceptor.notify_unauthorized(issued_epoch);
            return Err(ApiError::Unauthorized);
        }
        if !resp.ok() {
            return Err(ApiError::Status(resp.status));
        }
        Ok(resp)
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| TransportError::Request(e.to_string()).into())
}

/// Decode an auth envelope from any status. A readable error body keeps the
/// server's `message`; an unreadable one falls back to the status code.
fn parse_auth_response(resp: &HttpResponse) -> Result<AuthResponse, ApiError> {
    match serde_json::from_str::<AuthResponse>(&resp.body) {
        Ok(mut parsed) => {
            if !resp.ok() {
                parsed.success = false;
            }
            Ok(parsed)
        }
        Err(_) if !resp.ok() => Err(ApiError::Status(resp.status)),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}
