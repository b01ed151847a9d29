use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://forumlib.me";
pub const DEFAULT_API_ENDPOINT: &str = "/api/forum";
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for one [`ForumLib`](crate::api::ForumLib) client.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host, e.g. "https://forumlib.me"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix placed between the host and every request path
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// Whole-request timeout in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Overrides the `User-Agent` header (defaults to "forumlib/<version>")
    pub user_agent: Option<String>,
    /// Parse JSON text found in string fields declared as objects or lists.
    #[serde(default = "default_embedded_json")]
    pub embedded_json: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_embedded_json() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_endpoint: default_api_endpoint(),
            timeout_ms: None,
            user_agent: None,
            embedded_json: default_embedded_json(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_endpoint(mut self, api_endpoint: impl Into<String>) -> Self {
        self.api_endpoint = api_endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.timeout_ms = Some(millis.max(1));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_embedded_json(mut self, enabled: bool) -> Self {
        self.embedded_json = enabled;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(USER_AGENT)
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(self.base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }
}

/// Logging settings for the command-line front end.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global level ("error", "warn", "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-module overrides, e.g. {"forumlib::api": "debug"}
    pub module_levels: BTreeMap<String, String>,
    /// When set, logs go to a daily rolling file in this directory
    pub log_directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: BTreeMap::new(),
            log_directory: None,
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string: the global level followed by module overrides.
    pub fn filter_directives(&self) -> String {
        let mut filter_str = self.level.clone();
        for (module, level) in &self.module_levels {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_ron_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        ron::from_str::<AppConfig>(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a RON config from an explicit path. Nothing is read implicitly.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_ron_str(&content, &path.display().to_string())?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
