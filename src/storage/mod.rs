//! Persisted session slots
//!
//! The token and the user profile live in two named slots of a small
//! key-value backend. Both slots are always written and removed together.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::{AppError, AppResult},
    models::{Session, UserProfile},
};

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Key-value backend holding string slots
pub trait SlotStorage: Send + Sync {
    /// Read several slots in one consistent snapshot
    fn get_items(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>>;

    /// Write every entry in a single step
    fn set_items(&self, entries: &[(&str, String)]) -> AppResult<()>;

    /// Remove every key in a single step; absent keys are ignored
    fn remove_items(&self, keys: &[&str]) -> AppResult<()>;

    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.get_items(&[key])?.pop().flatten())
    }
}

/// Session slots over a shared backend
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn SlotStorage>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn SlotStorage>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store over the configured backend
    pub fn open(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::Memory => Self::in_memory(),
            StorageBackend::File => {
                tracing::debug!("Session file: {}", config.path.display());
                Self::new(Arc::new(FileStorage::new(&config.path)))
            }
        }
    }

    /// Persist token and profile together
    pub fn set(&self, token: &str, user: &UserProfile) -> AppResult<()> {
        let blob = serde_json::to_string(user)?;
        self.backend
            .set_items(&[(TOKEN_KEY, token.to_string()), (USER_KEY, blob)])
    }

    /// Raw bearer token, if one is stored
    pub fn token(&self) -> AppResult<Option<String>> {
        Ok(self
            .backend
            .get_item(TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    /// Last persisted session.
    ///
    /// A profile that does not parse, or a slot stored without its partner,
    /// is reported as [`AppError::MalformedLocalState`].
    pub fn get(&self) -> AppResult<Option<Session>> {
        let mut slots = self.backend.get_items(&[TOKEN_KEY, USER_KEY])?.into_iter();
        let token = slots.next().flatten().filter(|token| !token.is_empty());
        let user = slots.next().flatten();

        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(blob)) => {
                let user: UserProfile = serde_json::from_str(&blob).map_err(|e| {
                    AppError::MalformedLocalState(format!("Stored user profile is unreadable: {}", e))
                })?;
                Ok(Some(Session { token, user }))
            }
            (Some(_), None) => Err(AppError::MalformedLocalState(
                "Token stored without a user profile".to_string(),
            )),
            (None, Some(_)) => Err(AppError::MalformedLocalState(
                "User profile stored without a token".to_string(),
            )),
        }
    }

    /// Remove both slots. Returns whether anything was stored.
    pub fn clear(&self) -> AppResult<bool> {
        let present = match self.backend.get_items(&[TOKEN_KEY, USER_KEY]) {
            Ok(slots) => slots.iter().any(Option::is_some),
            // unreadable state still counts as a session to end
            Err(_) => true,
        };
        self.backend.remove_items(&[TOKEN_KEY, USER_KEY])?;
        Ok(present)
    }
}
