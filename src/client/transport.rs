use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::llm::build_http_client;
use crate::models::chat::ChatTurn;
use crate::models::relay::extract_reply;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("relay returned an unreadable body: {0}")]
    Decode(String),
}

/// Carries one trimmed conversation to the relay and returns the reply
/// text, `None` when the relay answered without one.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, messages: &[ChatTurn]) -> Result<Option<String>, ClientError>;
}

#[derive(Serialize)]
struct OutboundBody<'a> {
    messages: &'a [ChatTurn],
}

pub struct HttpRelayTransport {
    http: HttpClient,
    endpoint: Url,
}

impl HttpRelayTransport {
    pub fn new(
        endpoint: &str,
        timeout: Option<Duration>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let endpoint = Url::parse(endpoint).map_err(|e|
            format!("Invalid relay endpoint '{}': {}", endpoint, e)
        )?;
        Ok(Self { http: build_http_client(timeout)?, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, messages: &[ChatTurn]) -> Result<Option<String>, ClientError> {
        let resp = self.http
            .post(self.endpoint.clone())
            .json(&(OutboundBody { messages }))
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), body });
        }

        let json: Value = resp.json().await.map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(extract_reply(&json).map(str::to_string))
    }
}
