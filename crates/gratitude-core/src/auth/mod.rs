//! Authentication module for managing the user's credentials.
//!
//! This module provides:
//! - `Session`: the access/refresh token pair
//! - `TokenStore`: the session provider injected into the API client, with
//!   memory, file and OS keychain backends
//! - OAuth callback and sign-in helpers that return the next `Route`

pub mod callback;
pub mod credentials;
pub mod session;
pub mod store;

pub use callback::{handle_oauth_callback, login};
pub use credentials::KeyringTokenStore;
pub use session::{Session, SessionEvent, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
