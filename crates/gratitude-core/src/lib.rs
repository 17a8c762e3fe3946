//! Core library for the gratitude journal client.
//!
//! - `api`: HTTP client with bearer auth and one-shot token refresh, plus the
//!   typed entry operations
//! - `auth`: session credentials, token stores and the OAuth callback
//! - `models`: entries, value lists and the entry form
//! - `routes`: navigation targets returned to the front end
//! - `config`: persisted settings

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionEvent, TokenStore};
pub use config::Config;
pub use routes::Route;
