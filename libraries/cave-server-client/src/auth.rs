//! Account methods for the Cave Player server.

use crate::client::{execute, parse_json};
use crate::error::Result;
use crate::types::MessageResponse;
use cave_core::{SignupRequest, UserProfile};
use reqwest::Client;
use tracing::{debug, info};

/// Account client for the Cave Player server.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Register a new account.
    ///
    /// No token is required. Returns the server's acknowledgement message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let url = format!("{}/auth/signup", self.base_url);
        debug!(url = %url, email = %request.email, "Registering account");

        let response = execute(self.http.post(&url).json(request)).await?;
        let body = response.text().await?;

        // Acknowledgement is `{"message": ...}`, older servers send plain text
        let message = serde_json::from_str::<MessageResponse>(&body)
            .map(|m| m.message)
            .unwrap_or(body);

        info!(email = %request.email, "Account registered");
        Ok(message)
    }

    /// Check whether an account exists for `email`.
    ///
    /// The response is free text; any body containing `true` means the
    /// account exists. The token is sent when available.
    pub async fn check_user(&self, email: &str, access_token: Option<&str>) -> Result<bool> {
        let url = format!("{}/user/check-user", self.base_url);
        debug!(url = %url, email = %email, "Checking account");

        let mut request = self.http.get(&url).query(&[("email", email)]);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let body = execute(request).await?.text().await?;
        let exists = body.contains("true");

        debug!(email = %email, exists, "Account check finished");
        Ok(exists)
    }

    /// Get the signed-in user's profile.
    pub async fn get_profile(&self, access_token: &str) -> Result<UserProfile> {
        let url = format!("{}/user/profile", self.base_url);
        debug!(url = %url, "Fetching profile");

        let response = execute(self.http.get(&url).bearer_auth(access_token)).await?;
        parse_json(response, "profile response").await
    }
}
