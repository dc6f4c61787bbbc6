pub mod forward;
pub mod openai;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use self::forward::ForwardBackend;
use self::openai::OpenAIBackend;
use crate::models::relay::CompletionRequest;
use crate::relay::RelayError;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Call the completion API directly with the relay's credential.
    Upstream,
    /// Hand the request to another relay instance that holds the credential.
    Forward,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseUpstreamModeError {
    message: String,
}

impl fmt::Display for ParseUpstreamModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseUpstreamModeError {}

impl FromStr for UpstreamMode {
    type Err = ParseUpstreamModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upstream" | "call-upstream" | "direct" => Ok(UpstreamMode::Upstream),
            "forward" | "forward-to" => Ok(UpstreamMode::Forward),
            _ =>
                Err(ParseUpstreamModeError {
                    message: format!("Invalid relay mode: '{}' (expected 'upstream' or 'forward')", s),
                }),
        }
    }
}

impl fmt::Display for UpstreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamMode::Upstream => write!(f, "upstream"),
            UpstreamMode::Forward => write!(f, "forward"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub mode: UpstreamMode,
    pub url: Url,
    pub timeout: Option<Duration>,
}

/// Performs the single outbound call of a relay invocation.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Whether the relay must look up a credential before calling `complete`.
    fn requires_credential(&self) -> bool;

    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: Option<&str>
    ) -> Result<Value, RelayError>;

    fn name(&self) -> &'static str;

    fn endpoint(&self) -> &Url;
}

pub fn new_backend(
    config: &BackendConfig
) -> Result<Arc<dyn CompletionBackend>, Box<dyn StdError + Send + Sync>> {
    let http = build_http_client(config.timeout)?;
    match config.mode {
        UpstreamMode::Upstream => Ok(Arc::new(OpenAIBackend::new(http, config.url.clone()))),
        UpstreamMode::Forward => Ok(Arc::new(ForwardBackend::new(http, config.url.clone()))),
    }
}

pub fn build_http_client(
    timeout: Option<Duration>
) -> Result<HttpClient, Box<dyn StdError + Send + Sync>> {
    let mut builder = HttpClient::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
}

/// POSTs `body` as JSON and decodes a JSON reply. A non-success status is
/// returned as `UpstreamError` carrying the upstream's status and raw body.
pub(crate) async fn post_json(
    http: &HttpClient,
    url: &Url,
    body: &CompletionRequest,
    bearer: Option<&str>
) -> Result<Value, RelayError> {
    let mut req = http.post(url.clone()).json(body);
    if let Some(token) = bearer {
        req = req.bearer_auth(token);
    }

    let resp = req.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    debug!("Upstream {} answered {} ({} bytes)", url, status, text.len());

    if !status.is_success() {
        return Err(RelayError::UpstreamError { status, body: text });
    }

    serde_json::from_str(&text).map_err(|e| RelayError::InvalidUpstreamResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes() {
        assert_eq!("upstream".parse::<UpstreamMode>(), Ok(UpstreamMode::Upstream));
        assert_eq!("Call-Upstream".parse::<UpstreamMode>(), Ok(UpstreamMode::Upstream));
        assert_eq!("forward".parse::<UpstreamMode>(), Ok(UpstreamMode::Forward));
        assert_eq!(" forward-to ".parse::<UpstreamMode>(), Ok(UpstreamMode::Forward));
        assert!("websocket".parse::<UpstreamMode>().is_err());
    }

    #[test]
    fn backend_matches_mode() {
        let upstream = new_backend(&BackendConfig {
            mode: UpstreamMode::Upstream,
            url: Url::parse(DEFAULT_UPSTREAM_URL).unwrap(),
            timeout: None,
        }).unwrap();
        assert!(upstream.requires_credential());
        assert_eq!(upstream.endpoint().as_str(), DEFAULT_UPSTREAM_URL);

        let forward = new_backend(&BackendConfig {
            mode: UpstreamMode::Forward,
            url: Url::parse("http://127.0.0.1:9000/").unwrap(),
            timeout: Some(Duration::from_secs(5)),
        }).unwrap();
        assert!(!forward.requires_credential());
        assert_eq!(forward.name(), "forward");
    }
}
