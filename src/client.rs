use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use reqwest::{Proxy, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::halo::GameMode;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Diagnostic handed back when the provider's error body is not JSON.
pub const API_ERROR: &str = "API error - check request parameters and try again.";

// we use separate error types for construction and request

#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("ProxyError: {0} from scheme: {1}.")]
    ProxyError(reqwest::Error, String),
    #[error("InvalidBaseUrl: {0}.")]
    InvalidBaseUrl(String),
    #[error("BuildError: {0}.")]
    BuildError(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to retrive result from web API: {0}")]
    ConnectionError(#[from] reqwest::Error),
    #[error("Unexpected response from web API: {status}")]
    UnexpectedStatus { status: StatusCode, data: Value },
    #[error("Failed to decode web API response: {0}")]
    DecodeError(serde_json::Error, String),
    #[error("Malformed web API response: {0}")]
    MalformedResponse(String),
}

/// The two provider resources the adapter reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Match { mode: GameMode, match_id: &'a str },
    PlayerMatches { gamertag: &'a str, mode: GameMode },
}

impl Display for Endpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Match { mode, match_id } => write!(f, "{} match {}", mode, match_id),
            Endpoint::PlayerMatches { gamertag, mode } => {
                write!(f, "{} history of {}", mode, gamertag)
            }
        }
    }
}

/// Fetches raw response bodies from the stats provider.
///
/// Implementations return `Ok` only for a 2xx response.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, endpoint: Endpoint<'_>) -> Result<String, RequestError>;
}

/// Fetch `endpoint` and decode the body into the expected provider shape.
pub async fn fetch_json<T, U>(upstream: &U, endpoint: Endpoint<'_>) -> Result<T, RequestError>
where
    T: DeserializeOwned,
    U: Upstream + ?Sized,
{
    let content = upstream.get(endpoint).await?;
    serde_json::from_str(&content).map_err(|err| {
        log::error!("DecodeError for {}: {}", endpoint, err);
        RequestError::DecodeError(err, content)
    })
}

/// Build the failure for a non-2xx response, keeping the body when it is JSON.
pub fn unexpected_status(status: StatusCode, content: &str) -> RequestError {
    let data = serde_json::from_str(content).unwrap_or_else(|_| Value::from(API_ERROR));
    RequestError::UnexpectedStatus { status, data }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub key: String,
    pub base_url: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

pub struct Client {
    client: reqwest::Client,
    key: String,
    base_url: Url,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, ConstructionError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| ConstructionError::InvalidBaseUrl(format!("{}: {}", config.base_url, err)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConstructionError::InvalidBaseUrl(config.base_url.clone()));
        }

        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        let builder = match config.proxy.as_deref() {
            Some(proxy) => {
                let proxy = Proxy::all(proxy)
                    .map_err(|err| ConstructionError::ProxyError(err, proxy.to_string()))?;
                builder.proxy(proxy)
            }
            None => builder,
        };
        let client = builder.build()?;
        let key = config.key.clone();
        Ok(Self {
            client,
            key,
            base_url,
        })
    }

    fn url(&self, endpoint: Endpoint<'_>) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`, a base url always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["stats", "h5"]);
            match endpoint {
                Endpoint::Match { mode, match_id } => {
                    segments.extend([mode.to_string().as_str(), "matches", match_id]);
                }
                Endpoint::PlayerMatches { gamertag, .. } => {
                    segments.extend(["players", gamertag, "matches"]);
                }
            }
        }
        if let Endpoint::PlayerMatches { mode, .. } = endpoint {
            url.query_pairs_mut()
                .append_pair("modes", &mode.to_string());
        }
        url
    }
}

#[async_trait]
impl Upstream for Client {
    async fn get(&self, endpoint: Endpoint<'_>) -> Result<String, RequestError> {
        let url = self.url(endpoint);
        log::debug!("requesting {} from {}", endpoint, url);
        let resp = self
            .client
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .send()
            .await?;
        let status = resp.status();
        let content = resp.text().await?;
        if status.is_success() {
            Ok(content)
        } else {
            log::warn!("{} answered with {}", endpoint, status);
            Err(unexpected_status(status, &content))
        }
    }
}
