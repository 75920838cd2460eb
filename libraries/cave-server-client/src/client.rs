//! Main Cave Player server client.

use crate::auth::AuthClient;
use crate::error::{Result, ServerClientError};
use crate::library::LibraryClient;
use crate::types::ClientConfig;
use cave_core::{CoreError, CredentialStore};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Client for the Cave Player server API.
///
/// Stateless per request: every authenticated call reads the bearer token
/// from the injected [`CredentialStore`], so a login or logout elsewhere is
/// picked up by the next request. There is no retry.
///
/// # Example
///
/// ```no_run
/// use cave_core::{LibraryService, MemoryCredentialStore};
/// use cave_server_client::{CaveServerClient, ClientConfig};
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Arc::new(MemoryCredentialStore::with_token("eyJ..."));
/// let client = CaveServerClient::new(ClientConfig::new("http://localhost:8080"), credentials)?;
///
/// let tracks = client.fetch_tracks().await?;
/// println!("Found {} tracks", tracks.len());
/// # Ok(())
/// # }
/// ```
pub struct CaveServerClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl CaveServerClient {
    /// Create a new client with the given configuration.
    ///
    /// The URL must be http(s); trailing slashes are trimmed and `/api` is
    /// appended.
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = url.trim_end_matches('/');
        let parsed = Url::parse(url)
            .map_err(|e| ServerClientError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("CavePlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        let base_url = format!("{}/api", url);
        debug!(base_url = %base_url, "Server client created");

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// API base URL, including the `/api` suffix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential store backing this client.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Get a library client for catalog, favorites, and playlist calls.
    ///
    /// Returns `AuthRequired` without any request when no token is stored.
    pub fn library(&self) -> Result<LibraryClient<'_>> {
        let access_token = self.bearer_token()?;
        Ok(LibraryClient::new(&self.http, &self.base_url, access_token))
    }

    /// Get an auth client for account calls.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Stored token, or `AuthRequired`.
    pub(crate) fn bearer_token(&self) -> Result<String> {
        self.credentials.require().map_err(|e| match e {
            CoreError::AuthRequired => ServerClientError::AuthRequired,
            other => ServerClientError::Io(std::io::Error::other(other.to_string())),
        })
    }

    /// Stored token if there is one; used by endpoints where auth is optional.
    pub(crate) fn optional_bearer_token(&self) -> Option<String> {
        match self.credentials.get() {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read credential, sending request without it");
                None
            }
        }
    }
}

/// Send a request and map non-success statuses.
///
/// 401 becomes `AuthRequired`; any other non-2xx becomes `ServerError` with
/// the response body as message.
pub(crate) async fn execute(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(ServerClientError::from_send)?;
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED {
        warn!(status = %status, "Server rejected credentials");
        Err(ServerClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ServerClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

/// Decode a JSON body.
pub(crate) async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ServerClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_core::MemoryCredentialStore;

    fn client(url: &str) -> Result<CaveServerClient> {
        CaveServerClient::new(ClientConfig::new(url), Arc::new(MemoryCredentialStore::new()))
    }

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(client("https://example.com").is_ok());
        assert!(client("http://localhost:8080").is_ok());

        // Invalid URLs
        assert!(client("").is_err());
        assert!(client("not-a-url").is_err());
        assert!(client("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = client("https://example.com//").expect("valid url");

        assert_eq!(client.base_url(), "https://example.com/api");
    }

    #[test]
    fn test_library_requires_token() {
        let client = client("http://localhost:8080").expect("valid url");

        assert!(matches!(
            client.library(),
            Err(ServerClientError::AuthRequired)
        ));
        assert!(client.optional_bearer_token().is_none());
    }
}
