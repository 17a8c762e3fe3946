//! Request pipeline of the API client.
//!
//! Every call runs through an ordered list of [`Middleware`] before it
//! reaches the transport. Each middleware gets the request, the per-call
//! [`RequestContext`] and a [`Next`] handle for the rest of the chain, so it
//! can rewrite the request, inspect the result, or run the rest of the chain
//! a second time.
//!
//! The default chain is [`RefreshOnUnauthorized`] followed by
//! [`BearerAuth`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::client::Transport;
use super::ApiError;
use crate::auth::{SessionEvent, TokenStore};
use crate::routes::Route;

/// Path of the token refresh endpoint, relative to the API base URL
pub const REFRESH_PATH: &str = "/auth/refresh";

/// An outgoing API call, relative to the client's base URL.
///
/// Cloneable so it can be sent a second time after re-authentication.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Config(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value
    pub fn set_bearer(&mut self, token: &str) -> Result<(), ApiError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::Config("Access token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        self.headers.insert(header::AUTHORIZATION, value);
        Ok(())
    }

    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Per-call state that travels next to the request through the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    refresh_attempted: bool,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context of a call that already used up its re-authentication
    pub fn retried() -> Self {
        Self {
            refresh_attempted: true,
        }
    }

    pub fn refresh_attempted(&self) -> bool {
        self.refresh_attempted
    }

    fn mark_refresh_attempted(&mut self) {
        self.refresh_attempted = true;
    }
}

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(
        &self,
        request: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError>;
}

/// The remainder of the middleware chain, ending at the transport
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a Transport,
    chain: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(transport: &'a Transport, chain: &'a [Arc<dyn Middleware>]) -> Self {
        Self { transport, chain }
    }

    pub async fn run(self, request: Request, ctx: &mut RequestContext) -> Result<Response, ApiError> {
        match self.chain.split_first() {
            Some((current, rest)) => {
                current
                    .handle(request, ctx, Next::new(self.transport, rest))
                    .await
            }
            None => self.transport.send(request).await,
        }
    }
}

/// Signs each request with the stored access token, if there is one.
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(
        &self,
        mut request: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError> {
        if let Some(token) = self.store.get().token() {
            request.set_bearer(token)?;
        }
        next.run(request, ctx).await
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Recovers from an expired access token.
///
/// On a 401 it trades the stored refresh token for a new access token and
/// sends the original request once more. A call gets at most one such
/// attempt. When recovery is impossible the store is cleared, a
/// [`SessionEvent::Expired`] is published and the caller receives the
/// original 401.
///
/// Concurrent calls that hit a 401 at the same time each run their own
/// refresh.
pub struct RefreshOnUnauthorized {
    client: Client,
    refresh_url: String,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl RefreshOnUnauthorized {
    pub fn new(
        client: Client,
        base_url: &str,
        store: Arc<dyn TokenStore>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            client,
            refresh_url: format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH),
            store,
            events,
        }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Deliberately bypasses the middleware chain: no bearer header and no
    /// recursion into this middleware.
    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(&self.refresh_url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse refresh response: {}", e)))?;

        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("No new token received from refresh".to_string()))
    }

    fn expire_session(&self) {
        let redirect = self.store.clear().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to clear stored credentials");
            Route::Login
        });
        // Nobody listening is fine
        let _ = self.events.send(SessionEvent::Expired { redirect });
    }
}

#[async_trait]
impl Middleware for RefreshOnUnauthorized {
    async fn handle(
        &self,
        request: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError> {
        let retry = request.clone();

        let original = match next.run(request, ctx).await {
            Err(e) if e.is_unauthorized() => e,
            other => return other,
        };

        if ctx.refresh_attempted() {
            debug!(path = %retry.path, "401 after re-authentication, giving up");
            return Err(original);
        }
        ctx.mark_refresh_attempted();

        let session = self.store.get();
        let Some(refresh_token) = session.renewal_token() else {
            warn!(path = %retry.path, "No refresh token found, session expired");
            self.expire_session();
            return Err(original);
        };

        let token = match self.refresh(refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, path = %retry.path, "Token refresh failed, session expired");
                self.expire_session();
                return Err(original);
            }
        };

        if let Err(e) = self.store.set_access_token(&token) {
            warn!(error = %e, "Failed to persist refreshed access token");
        }
        info!(path = %retry.path, "Access token refreshed, retrying request");

        let mut retry = retry;
        retry.set_bearer(&token)?;
        next.run(retry, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bearer() {
        let mut request = Request::get("/entries");
        assert_eq!(request.bearer(), None);

        request.set_bearer("abc").expect("set bearer");
        request.set_bearer("xyz").expect("replace bearer");
        assert_eq!(request.bearer(), Some("xyz"));
        assert_eq!(request.headers.get_all(header::AUTHORIZATION).iter().count(), 1);

        assert!(request.set_bearer("bad\ntoken").is_err());
    }

    #[test]
    fn test_request_context_marker() {
        let mut ctx = RequestContext::new();
        assert!(!ctx.refresh_attempted());
        ctx.mark_refresh_attempted();
        assert_eq!(ctx, RequestContext::retried());
    }

    #[test]
    fn test_refresh_payload_shape() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "def" }).expect("serialize");
        assert_eq!(body, serde_json::json!({ "refreshToken": "def" }));

        let parsed: RefreshResponse =
            serde_json::from_str(r#"{"accessToken":"xyz","expiresIn":900}"#).expect("parse");
        assert_eq!(parsed.access_token.as_deref(), Some("xyz"));

        let missing: RefreshResponse = serde_json::from_str("{}").expect("parse");
        assert!(missing.access_token.is_none());
    }
}
