use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use url::Url;

use super::session::Session;
use super::store::TokenStore;
use crate::routes::Route;

/// Query parameter the identity provider appends to the callback URL
const TOKEN_PARAM: &str = "token";

/// Finish an external sign-in flow.
///
/// Stores the `token` query parameter as the access token and sends the
/// user home. Without the parameter the store is left alone and the user
/// goes back to the login page.
pub fn handle_oauth_callback(callback_url: &str, store: &dyn TokenStore) -> Result<Route> {
    let url = Url::parse(callback_url).context("Failed to parse OAuth callback URL")?;

    let token = url
        .query_pairs()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    match token {
        Some(token) => {
            store.set_access_token(&token)?;
            info!("Signed in via OAuth callback");
            Ok(Route::Home)
        }
        None => {
            debug!("OAuth callback without token, back to login");
            Ok(Route::Login)
        }
    }
}

/// Sign in with a credential issued by the identity provider.
pub fn login(store: &dyn TokenStore, credential: &str, refresh_token: Option<String>) -> Result<Route> {
    let credential = credential.trim();
    if credential.is_empty() {
        bail!("No access token given");
    }
    let refresh_token = refresh_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    store.set_session(Session::new(credential, refresh_token))?;
    Ok(Route::Home)
}
