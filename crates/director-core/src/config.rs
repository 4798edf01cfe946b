//! Client configuration.
//!
//! Defaults, then an optional TOML file, then the `DIRECTOR_API_URL`
//! environment variable; the CLI applies its own flags last.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{DirectorError, DirectorResult};

/// Default backend URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default path prefix shared by every endpoint.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "DIRECTOR_API_URL";

/// Settings for reaching the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub health_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout_secs: 120,
            probe_timeout_secs: 5,
            health_interval_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from file and environment.
    ///
    /// An explicit `path` must exist. Without one, the per-user file under
    /// the platform config directory is read when present.
    pub fn load(path: Option<&Path>) -> DirectorResult<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(DirectorError::config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.exists()),
        };

        let config = match file {
            Some(p) => {
                debug!(path = %p.display(), "Loading client config");
                let text = std::fs::read_to_string(&p)?;
                Self::from_toml_str(&text).map_err(|e| {
                    DirectorError::config(format!("{}: {}", p.display(), e))
                })?
            }
            None => Self::default(),
        };

        let config = match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => config,
        };

        Ok(config)
    }

    /// Per-user config location (`<config_dir>/director/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("director").join("config.toml"))
    }

    /// Parse and normalize a TOML document.
    pub fn from_toml_str(text: &str) -> DirectorResult<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.normalized())
    }

    /// Replace the backend URL.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();

        let prefix = self.api_prefix.trim().trim_matches('/');
        self.api_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", prefix)
        };
        self
    }

    /// Full URL of an endpoint path such as `/direct`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }
}
