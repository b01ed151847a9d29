//! Error taxonomy for the forum client.
//!
//! Every fallible operation in the crate returns [`ClientError`] (or one of
//! its inner enums, which convert into it with `?`). Callers can match on the
//! root broadly or on a specific variant narrowly.

/// Root error returned by every client call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// DNS, connect, timeout, or an interrupted body read.
    #[error("network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("status error: {status}, {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status code carried by a [`ClientError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// A response body that could not be turned into a model.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not JSON at all.
    #[error("failed to parse JSON from response: {0}")]
    Json(#[from] serde_json::Error),

    /// A string that should have carried embedded JSON text did not.
    #[error("`{path}`: embedded JSON text is malformed: {source}")]
    EmbeddedJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is well formed but does not fit the declared schema.
    #[error("`{path}`: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: serde_json::Value,
    },
}

impl DecodeError {
    pub(crate) fn mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: serde_json::Value,
    ) -> Self {
        Self::Mismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Location of the offending value, `None` for a malformed body.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::EmbeddedJson { path, .. } | Self::Mismatch { path, .. } => Some(path),
        }
    }
}

/// An invalid caller-supplied argument or configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("query key `{key}` must be an integer, got `{value}`")]
    NonIntegerParam { key: String, value: String },

    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
