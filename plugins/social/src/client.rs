use agent_actions_core::Agent;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CAST_API: &str = "https://api.neynar.com/v2/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedCast {
    pub hash: String,
}

/// Why a cast was not published.
///
/// Publishing is not idempotent, so only failures where the server cannot
/// have stored the cast are retryable.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The request never reached the server.
    #[error("cast API unreachable: {0}")]
    Unreachable(String),
    #[error("Failed to publish cast: {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PublishError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            // rate limits and gateway errors are answered before the API handles the body
            Self::Status(status) => matches!(status.as_u16(), 429 | 502 | 503 | 504),
            Self::Other(_) => false,
        }
    }
}

/// Posting and profile access for one Farcaster account.
#[async_trait]
pub trait CastClient: Send + Sync {
    async fn publish(&self, agent: &Agent, text: &str) -> Result<PublishedCast, PublishError>;

    /// Profile of the account this client posts as.
    async fn account(&self, agent: &Agent) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct CastCredentials {
    pub api_key: String,
    pub signer_uuid: String,
    pub fid: u64,
}

/// Client for a Neynar-compatible HTTP API.
///
/// Requests go through the agent's shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpCastClient {
    base_url: Url,
    credentials: CastCredentials,
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    signer_uuid: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct PublishResponse {
    cast: PublishedCast,
}

impl HttpCastClient {
    pub fn new(base_url: Url, credentials: CastCredentials) -> Self {
        Self {
            base_url,
            credentials,
        }
    }

    pub fn neynar(credentials: CastCredentials) -> Result<Self> {
        Ok(Self::new(Url::parse(DEFAULT_CAST_API)?, credentials))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("cast API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn cast_url(&self) -> Result<Url> {
        self.endpoint(&["farcaster", "cast"])
    }

    fn user_url(&self) -> Result<Url> {
        let mut url = self.endpoint(&["farcaster", "user", "bulk"])?;
        url.query_pairs_mut()
            .append_pair("fids", &self.credentials.fid.to_string());
        Ok(url)
    }
}

#[async_trait]
impl CastClient for HttpCastClient {
    async fn publish(&self, agent: &Agent, text: &str) -> Result<PublishedCast, PublishError> {
        let url = self.cast_url()?;
        tracing::debug!(%url, chars = text.chars().count(), "publishing cast");

        let response = agent
            .http
            .post(url)
            .header("api_key", &self.credentials.api_key)
            .json(&PublishRequest {
                signer_uuid: &self.credentials.signer_uuid,
                text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PublishError::Unreachable(e.to_string())
                } else {
                    PublishError::Other(anyhow::Error::new(e).context("cast API request failed"))
                }
            })?;

        if !response.status().is_success() {
            return Err(PublishError::Status(response.status()));
        }

        let body: PublishResponse = response
            .json()
            .await
            .context("cast API returned an unexpected body")?;
        Ok(body.cast)
    }

    async fn account(&self, agent: &Agent) -> Result<Value> {
        let url = self.user_url()?;
        let response = agent
            .http
            .get(url)
            .header("api_key", &self.credentials.api_key)
            .send()
            .await
            .context("cast API request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch account details: {}", response.status()));
        }

        let mut body: Value = response.json().await.context("cast API returned invalid JSON")?;
        let user = body
            .get_mut("users")
            .and_then(|users| users.get_mut(0))
            .map(Value::take);
        match user {
            Some(user) => Ok(user),
            None => Err(anyhow!("no account found for fid {}", self.credentials.fid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpCastClient {
        HttpCastClient::new(
            Url::parse(base).unwrap(),
            CastCredentials {
                api_key: "key".to_string(),
                signer_uuid: "signer".to_string(),
                fid: 1234,
            },
        )
    }

    #[test]
    fn endpoints_extend_base_path() {
        let client = client("https://casts.example.com/v2/");
        assert_eq!(
            client.cast_url().unwrap().as_str(),
            "https://casts.example.com/v2/farcaster/cast"
        );
        assert_eq!(
            client.user_url().unwrap().as_str(),
            "https://casts.example.com/v2/farcaster/user/bulk?fids=1234"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let client = client("https://casts.example.com/v2");
        assert_eq!(
            client.cast_url().unwrap().as_str(),
            "https://casts.example.com/v2/farcaster/cast"
        );
    }

    #[test]
    fn publish_response_shape() {
        let body: PublishResponse =
            serde_json::from_value(serde_json::json!({"cast": {"hash": "0xabc", "author": {}}}))
                .unwrap();
        assert_eq!(body.cast.hash, "0xabc");
    }

    #[test]
    fn only_unaccepted_failures_are_retryable() {
        assert!(PublishError::Unreachable("connection refused".to_string()).is_retryable());
        assert!(PublishError::Status(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
        assert!(PublishError::Status(StatusCode::TOO_MANY_REQUESTS).is_retryable());

        assert!(!PublishError::Status(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!PublishError::Status(StatusCode::BAD_REQUEST).is_retryable());
        assert!(!PublishError::Status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(!PublishError::Other(anyhow!("unexpected body")).is_retryable());
    }

    #[test]
    fn status_errors_read_like_the_api_failure() {
        assert_eq!(
            PublishError::Status(StatusCode::UNAUTHORIZED).to_string(),
            "Failed to publish cast: 401 Unauthorized"
        );
    }
}
