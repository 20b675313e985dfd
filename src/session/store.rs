use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::debug;

use super::storage::{keys, Storage};

/// Shared handle to the session store.
/// Background request tasks read the token at send time, so the store
/// lives behind a mutex.
pub type SharedSession = Arc<Mutex<SessionStore>>;

/// Canonical session state: the bearer token plus the signed-in user's
/// profile, backed by persistent storage. The empty token is the
/// signed-out state.
pub struct SessionStore {
    storage: Storage,
    token: String,
    username: String,
    email: String,
}

impl SessionStore {
    /// Load session state from storage. Missing keys load as empty strings.
    pub fn load(storage: Storage) -> Result<Self> {
        let token = storage.get(keys::TOKEN)?.unwrap_or_default();
        let username = storage.get(keys::USERNAME)?.unwrap_or_default();
        let email = storage.get(keys::EMAIL)?.unwrap_or_default();
        Ok(Self {
            storage,
            token,
            username,
            email,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether a session is active. Computed from the token on every call,
    /// never cached separately.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Store a new bearer token in memory and on disk.
    /// The token is opaque; no shape is assumed.
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.token = token.to_string();
        self.storage.set(keys::TOKEN, token)?;
        debug!("Session token updated");
        Ok(())
    }

    /// Store the signed-in user's profile in memory and on disk
    pub fn set_user_info(&mut self, username: &str, email: &str) -> Result<()> {
        self.username = username.to_string();
        self.email = email.to_string();
        self.storage.set(keys::USERNAME, username)?;
        self.storage.set(keys::EMAIL, email)?;
        Ok(())
    }

    /// Clear the session in memory and on disk.
    /// Safe to call when already signed out.
    pub fn logout(&mut self) -> Result<()> {
        self.token.clear();
        self.username.clear();
        self.email.clear();
        self.storage.remove(keys::TOKEN)?;
        self.storage.remove(keys::USERNAME)?;
        self.storage.remove(keys::EMAIL)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Read the token straight from storage, bypassing the in-memory copy.
    /// Request dispatch and navigation use this read so they always observe
    /// the most recently persisted value.
    pub fn persisted_token(&self) -> Result<Option<String>> {
        self.storage.get(keys::TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn test_storage() -> Storage {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "minijira-session-test-{}-{}",
            std::process::id(),
            seq
        ));
        Storage::new(dir)
    }

    #[test]
    fn test_starts_signed_out() {
        let store = SessionStore::load(test_storage()).unwrap();
        assert_eq!(store.token(), "");
        assert!(!store.is_authenticated());
        assert_eq!(store.persisted_token().unwrap(), None);
    }

    #[test]
    fn test_set_token_persists_and_authenticates() {
        let mut store = SessionStore::load(test_storage()).unwrap();
        store.set_token("jwt-abc").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.token(), "jwt-abc");
        assert_eq!(store.persisted_token().unwrap().as_deref(), Some("jwt-abc"));
    }

    #[test]
    fn test_user_info_is_independent_of_token() {
        let mut store = SessionStore::load(test_storage()).unwrap();
        store.set_user_info("carol", "carol@example.com").unwrap();

        assert_eq!(store.username(), "carol");
        assert_eq!(store.email(), "carol@example.com");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let mut store = SessionStore::load(test_storage()).unwrap();
        store.set_token("jwt-abc").unwrap();
        store.set_user_info("carol", "carol@example.com").unwrap();

        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(store.token(), "");
        assert_eq!(store.username(), "");
        assert_eq!(store.email(), "");
        assert_eq!(store.persisted_token().unwrap(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut store = SessionStore::load(test_storage()).unwrap();
        store.logout().unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());

        store.set_token("jwt-abc").unwrap();
        store.logout().unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.persisted_token().unwrap(), None);
    }

    #[test]
    fn test_session_survives_reload() {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "minijira-session-reload-{}-{}",
            std::process::id(),
            seq
        ));

        let mut store = SessionStore::load(Storage::new(dir.clone())).unwrap();
        store.set_token("jwt-abc").unwrap();
        store.set_user_info("carol", "carol@example.com").unwrap();
        drop(store);

        let reloaded = SessionStore::load(Storage::new(dir)).unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), "jwt-abc");
        assert_eq!(reloaded.username(), "carol");
        assert_eq!(reloaded.email(), "carol@example.com");
    }
}
