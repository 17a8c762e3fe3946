//! REST API client module for the journal service.
//!
//! This module provides the `ApiClient` for listing, creating and deleting
//! gratitude entries and for fetching the configurable value lists.
//!
//! Requests are signed with a bearer access token from the injected
//! `TokenStore`. An expired token is exchanged once per call through the
//! `/auth/refresh` endpoint before the failure is reported.

pub mod client;
pub mod error;
pub mod journal;
pub mod middleware;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use middleware::{BearerAuth, Middleware, Next, RefreshOnUnauthorized, Request, RequestContext};
