//! Persisted bearer credential
//!
//! The token used to be read ambiently from browser storage. Here it is an
//! explicit provider injected into whoever needs it.

use crate::error::{CoreError, Result};
use crate::token::TokenClaims;
use std::sync::RwLock;

/// Fixed key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Storage for the bearer token
pub trait CredentialStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the stored token (logout)
    fn clear(&self) -> Result<()>;

    /// Current token, or `AuthRequired` when none is stored
    fn require(&self) -> Result<String> {
        self.get()?
            .filter(|t| !t.trim().is_empty())
            .ok_or(CoreError::AuthRequired)
    }

    /// Decode the claims of the current token without verifying its signature
    fn claims(&self) -> Result<TokenClaims> {
        TokenClaims::decode_unverified(&self.require()?)
    }
}

/// In-memory credential store
///
/// Nothing survives the process; used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        self.token
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| CoreError::storage(e.to_string()))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| CoreError::storage(e.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| CoreError::storage(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}
