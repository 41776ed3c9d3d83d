//! Session tokens kept across reloads.

use crate::shared::storage::{AppStorage, KeyValueStorage};

const ACCESS_TOKEN_KEY: &str = "auth_access_token";
const REFRESH_TOKEN_KEY: &str = "auth_refresh_token";
const USERNAME_KEY: &str = "auth_username";

/// Token and username slots over any key-value storage
pub struct Session<S> {
    storage: S,
}

impl<S: KeyValueStorage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> Option<String> {
        non_empty(self.storage.get_item(ACCESS_TOKEN_KEY))
    }

    pub fn username(&self) -> Option<String> {
        non_empty(self.storage.get_item(USERNAME_KEY))
    }

    /// Stores a fresh login; a missing refresh token drops any old one.
    pub fn store(&self, access: &str, refresh: Option<&str>, username: &str) {
        self.storage.set_item(ACCESS_TOKEN_KEY, access);
        match refresh {
            Some(token) => self.storage.set_item(REFRESH_TOKEN_KEY, token),
            None => self.storage.remove_item(REFRESH_TOKEN_KEY),
        }
        self.storage.set_item(USERNAME_KEY, username);
    }

    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USERNAME_KEY] {
            self.storage.remove_item(key);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn session() -> Session<AppStorage> {
    Session::new(AppStorage::detect())
}

pub fn get_access_token() -> Option<String> {
    session().access_token()
}

pub fn get_username() -> Option<String> {
    session().username()
}

pub fn save_session(access: &str, refresh: Option<&str>, username: &str) {
    session().store(access, refresh, username);
}

/// Clear all authentication state
pub fn clear_tokens() {
    session().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;

    #[test]
    fn test_store_and_clear() {
        let storage = MemoryStorage::new();
        let session = Session::new(storage.clone());
        session.store("abc", Some("def"), "alice");
        assert_eq!(session.access_token().as_deref(), Some("abc"));
        assert_eq!(session.username().as_deref(), Some("alice"));
        assert_eq!(storage.get_item(REFRESH_TOKEN_KEY).as_deref(), Some("def"));

        session.store("xyz", None, "bob");
        assert_eq!(storage.get_item(REFRESH_TOKEN_KEY), None);

        session.clear();
        assert_eq!(session.access_token(), None);
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_blank_token_means_logged_out() {
        let storage = MemoryStorage::new();
        storage.set_item(ACCESS_TOKEN_KEY, "  ");
        assert_eq!(Session::new(storage).access_token(), None);
    }
}
