/// CLI configuration
use cave_playback::PlaybackConfig;
use cave_server_client::ClientConfig;
use config::{ConfigError, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cave.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,

    #[serde(default)]
    pub player: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialSettings {
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `cave.toml`; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. CAVE_SERVER__URL
        settings = settings.add_source(
            config::Environment::with_prefix("CAVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.url is required (set CAVE_SERVER__URL)".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "server.timeout_secs must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.player.volume) {
            return Err(ConfigError::Message(format!(
                "player.volume must be between 0.0 and 1.0, got {}",
                self.player.volume
            )));
        }

        Ok(())
    }

    /// Connection settings for the server client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.server.url.clone())
            .with_timeout(Duration::from_secs(self.server.timeout_secs))
    }
}

// Default values
fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("cave-credentials.json")
}
