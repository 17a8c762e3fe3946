use anyhow::{Context, Result};
use keyring::Entry;
use parking_lot::RwLock;
use tracing::warn;

use super::session::{Session, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use super::store::TokenStore;
use crate::routes::Route;

const SERVICE_NAME: &str = "gratitude-journal";

/// Token store backed by the OS keychain.
///
/// Each credential is its own keychain entry, with the storage key as the
/// account name.
#[derive(Debug)]
pub struct KeyringTokenStore {
    service: String,
    session: RwLock<Session>,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: &str) -> Self {
        let session = Session {
            access_token: Self::read(service, ACCESS_TOKEN_KEY),
            refresh_token: Self::read(service, REFRESH_TOKEN_KEY),
        };
        Self {
            service: service.to_string(),
            session: RwLock::new(session),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }

    fn read(service: &str, key: &str) -> Option<String> {
        let entry = Entry::new(service, key).ok()?;
        match entry.get_password() {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, key, "Failed to read credential from keychain");
                None
            }
        }
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<()> {
        let entry = self.entry(key)?;
        match value {
            Some(value) => entry
                .set_password(value)
                .context("Failed to store credential in keychain"),
            None => match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(e).context("Failed to delete credential from keychain"),
            },
        }
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Session {
        self.session.read().clone()
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.session.write().access_token = Some(token.to_string());
        self.write(ACCESS_TOKEN_KEY, Some(token))
    }

    fn set_session(&self, session: Session) -> Result<()> {
        *self.session.write() = session.clone();
        self.write(ACCESS_TOKEN_KEY, session.access_token.as_deref())?;
        self.write(REFRESH_TOKEN_KEY, session.refresh_token.as_deref())
    }

    fn clear(&self) -> Result<Route> {
        *self.session.write() = Session::default();
        // Both entries go, even if the first delete fails
        let access = self.write(ACCESS_TOKEN_KEY, None);
        let refresh = self.write(REFRESH_TOKEN_KEY, None);
        access.and(refresh)?;
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store() -> KeyringTokenStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringTokenStore::with_service("gratitude-journal-test")
    }

    #[test]
    fn test_missing_entries_read_as_empty() {
        let store = mock_store();
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_set_and_clear_session() {
        let store = mock_store();
        store
            .set_session(Session::new("abc", Some("def".to_string())))
            .expect("set session");
        store.set_access_token("xyz").expect("set token");

        let session = store.get();
        assert_eq!(session.token(), Some("xyz"));
        assert_eq!(session.renewal_token(), Some("def"));

        assert_eq!(store.clear().expect("clear"), Route::Login);
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_clear_without_entries_succeeds() {
        let store = mock_store();
        assert_eq!(store.clear().expect("clear"), Route::Login);
        assert!(store.get().is_empty());
    }
}
