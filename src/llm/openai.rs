use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use super::{ post_json, CompletionBackend };
use crate::models::relay::CompletionRequest;
use crate::relay::RelayError;

/// OpenAI-compatible `/v1/chat/completions` endpoint, authorized with a
/// bearer token.
pub struct OpenAIBackend {
    http: HttpClient,
    url: Url,
}

impl OpenAIBackend {
    pub fn new(http: HttpClient, url: Url) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl CompletionBackend for OpenAIBackend {
    fn requires_credential(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: Option<&str>
    ) -> Result<Value, RelayError> {
        let api_key = credential.ok_or(RelayError::CredentialNotConfigured)?;
        info!(
            "Calling completion API: model={} messages={} max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );
        post_json(&self.http, &self.url, request, Some(api_key)).await
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn endpoint(&self) -> &Url {
        &self.url
    }
}
