//! HTTP transport: builds requests against `base_url/api_endpoint/path`,
//! sends them with one pooled blocking client, and returns parsed JSON.

use std::fmt;
use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value as Json;

use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError, DecodeError};
use crate::utils::url::join_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
        }
    }
}

/// A query parameter value as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

pub type Query = Vec<(String, QueryValue)>;

/// One logical request: method, path relative to the API prefix, query.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub path: String,
    pub params: Query,
}

impl RequestOptions {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Normalizes query parameters before they go on the wire. `page` must be an
/// integer and is clamped to at least 1.
pub fn prepare_params(
    params: &[(String, QueryValue)],
) -> Result<Vec<(String, String)>, ConfigError> {
    params
        .iter()
        .map(|(key, value)| match (key.as_str(), value) {
            ("page", QueryValue::Int(page)) => Ok((key.clone(), (*page).max(1).to_string())),
            ("page", QueryValue::Str(other)) => Err(ConfigError::NonIntegerParam {
                key: key.clone(),
                value: other.clone(),
            }),
            _ => Ok((key.clone(), value.to_string())),
        })
        .collect()
}

/// Owns the pooled HTTP client for the lifetime of a `ForumLib`.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    base_url: String,
    api_endpoint: String,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // `None` disables reqwest's default blocking timeout
        let client = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            api_endpoint: config.api_endpoint.trim().trim_matches('/').to_string(),
        })
    }

    pub fn build_url(&self, path: &str) -> String {
        join_url(&self.base_url, &self.api_endpoint, path)
    }

    /// Sends one request and returns the decoded JSON body.
    #[tracing::instrument(
        skip(self, options),
        fields(method = %options.method, path = %options.path)
    )]
    pub fn request(&self, options: &RequestOptions) -> Result<Json, ClientError> {
        let start = Instant::now();
        let url = self.build_url(&options.path);
        let params = prepare_params(&options.params)?;

        let response = self
            .client
            .request(options.method.as_reqwest(), &url)
            .query(&params)
            .send()
            .map_err(|source| ClientError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ClientError::Network {
            url: url.clone(),
            source,
        })?;

        tracing::debug!(
            elapsed = ?start.elapsed(),
            status = status.as_u16(),
            url = %url,
            "http.request"
        );

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "non-success response");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DecodeError::Json(e).into())
    }

    pub fn get(&self, path: &str, params: Query) -> Result<Json, ClientError> {
        self.request(&RequestOptions {
            method: Method::Get,
            path: path.to_string(),
            params,
        })
    }
}
