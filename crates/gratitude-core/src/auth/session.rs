use serde::{Deserialize, Serialize};

use crate::routes::Route;

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Credentials of the current user.
///
/// No expiry metadata is tracked locally; the server tells us a token is
/// stale by answering 401.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    /// Access token to sign requests with; an empty value counts as absent
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Refresh token to renew with; an empty value counts as absent
    pub fn renewal_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether requests can be signed
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Whether a silent re-authentication can be attempted
    pub fn can_refresh(&self) -> bool {
        self.renewal_token().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Session lifecycle notifications for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Re-authentication failed and the stored credentials were dropped
    Expired { redirect: Route },
    /// The user signed out
    SignedOut { redirect: Route },
}

impl SessionEvent {
    pub fn redirect(&self) -> Route {
        match self {
            SessionEvent::Expired { redirect } | SessionEvent::SignedOut { redirect } => *redirect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_storage_keys() {
        let session = Session::new("abc", Some("def".to_string()));
        let json = serde_json::to_value(&session).expect("serialize session");
        assert_eq!(json[ACCESS_TOKEN_KEY], "abc");
        assert_eq!(json[REFRESH_TOKEN_KEY], "def");

        let partial: Session = serde_json::from_str(r#"{"token":"abc"}"#).expect("parse session");
        assert!(partial.is_authenticated());
        assert!(!partial.can_refresh());

        let empty: Session = serde_json::from_str("{}").expect("parse empty session");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_tokens_count_as_absent() {
        let session: Session =
            serde_json::from_str(r#"{"token":"","refreshToken":""}"#).expect("parse session");
        assert_eq!(session.token(), None);
        assert_eq!(session.renewal_token(), None);
        assert!(!session.is_authenticated());
        assert!(!session.can_refresh());
    }
}
