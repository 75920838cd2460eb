//! Bearer token claims
//!
//! The token is a JWT whose payload carries the account email in `sub`. It is
//! decoded here WITHOUT signature verification, only to branch client logic.
//! Nothing in this module is an authorization check.

use crate::error::{CoreError, Result};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims read from the token payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the account email
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry (unix seconds)
    #[serde(default)]
    pub exp: Option<i64>,

    /// Issued at (unix seconds)
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| CoreError::InvalidToken("missing payload segment".into()))?;

        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|e| CoreError::InvalidToken(format!("payload is not base64: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::InvalidToken(format!("payload is not JSON: {}", e)))
    }

    /// Lowercased account email, if the token carries one
    pub fn email(&self) -> Option<String> {
        self.sub
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether the token had expired at `now`; tokens without `exp` never expire
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp <= now.timestamp())
    }
}
