// ── Token persistence seam ──
//
// The session is the only thing that reads or writes the persisted token,
// and it does so through this trait. Durable stores (file, OS keyring)
// live in ipam-config; the in-memory one here serves tests and one-shot use.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;

use crate::error::CoreError;

/// Durable home of the single session token.
pub trait TokenStore: Send + Sync {
    /// The persisted token, or `None` if there is none.
    fn load(&self) -> Result<Option<SecretString>, CoreError>;

    fn save(&self, token: &SecretString) -> Result<(), CoreError>;

    /// Remove the persisted token. Removing an absent token is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Token store that forgets everything when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<SecretString>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if a previous run persisted it.
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        Self {
            token: ArcSwapOption::from_pointee(token.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.load().is_none()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.token.load_full().map(|token| (*token).clone()))
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.token.store(Some(Arc::new(token.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.token.store(None);
        Ok(())
    }
}
