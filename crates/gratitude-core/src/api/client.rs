//! API client for the gratitude journal REST API.
//!
//! `ApiClient` sends every call through the middleware chain in
//! [`super::middleware`], which signs requests with the stored access token
//! and silently re-authenticates once when the server answers 401.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::middleware::{BearerAuth, Middleware, Next, RefreshOnUnauthorized, Request, RequestContext};
use super::ApiError;
use crate::auth::{Session, SessionEvent, TokenStore};
use crate::config::{Config, DEFAULT_API_URL};
use crate::routes::Route;

/// Buffered session events per subscriber before old ones are dropped
const SESSION_EVENT_CAPACITY: usize = 16;

/// Last link of the middleware chain: puts the request on the wire.
pub(crate) struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    /// Send the request. Non-success statuses come back as `ApiError`.
    pub(crate) async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(url = %url, status = status.as_u16(), "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }
}

/// API client for the journal service.
/// Clone is cheap - everything inside is reference counted.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<Transport>,
    middleware: Arc<[Arc<dyn Middleware>]>,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut builder = Self::builder().base_url(config.api_base_url()).store(store);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    pub fn session(&self) -> Session {
        self.store.get()
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Receive session expiry and sign-out notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Send a request through the middleware chain
    pub async fn dispatch(&self, request: Request) -> Result<Response, ApiError> {
        let mut ctx = RequestContext::new();
        self.dispatch_with_context(request, &mut ctx).await
    }

    /// Send a request with caller-provided per-call state
    pub async fn dispatch_with_context(
        &self,
        request: Request,
        ctx: &mut RequestContext,
    ) -> Result<Response, ApiError> {
        Next::new(&self.transport, &self.middleware)
            .run(request, ctx)
            .await
    }

    /// Drop the stored credentials and tell subscribers the user signed out
    pub fn logout(&self) -> Result<Route> {
        let redirect = self.store.clear()?;
        let _ = self.events.send(SessionEvent::SignedOut { redirect });
        info!("Signed out");
        Ok(redirect)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .dispatch(Request::get(path))
            .await
            .with_context(|| format!("GET {} failed", path))?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let request = Request::post(path).json(body)?;
        let response = self
            .dispatch(request)
            .await
            .with_context(|| format!("POST {} failed", path))?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .dispatch(Request::delete(path))
            .await
            .with_context(|| format!("DELETE {} failed", path))?;
        if response.status() != StatusCode::NO_CONTENT {
            debug!(path, status = response.status().as_u16(), "DELETE returned a body");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    store: Option<Arc<dyn TokenStore>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout. Without one the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Append a middleware after the built-in auth middleware
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let store = self
            .store
            .ok_or_else(|| ApiError::Config("A token store is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut client = Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        let mut chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(RefreshOnUnauthorized::new(
                client.clone(),
                &base_url,
                store.clone(),
                events.clone(),
            )),
            Arc::new(BearerAuth::new(store.clone())),
        ];
        chain.extend(self.middleware);

        Ok(ApiClient {
            transport: Arc::new(Transport { client, base_url }),
            middleware: chain.into(),
            store,
            events,
        })
    }
}
