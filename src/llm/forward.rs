use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use super::{ post_json, CompletionBackend };
use crate::models::relay::CompletionRequest;
use crate::relay::RelayError;

/// Passes the request on to another relay instance. That relay owns the
/// credential, so none is attached here.
pub struct ForwardBackend {
    http: HttpClient,
    url: Url,
}

impl ForwardBackend {
    pub fn new(http: HttpClient, url: Url) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl CompletionBackend for ForwardBackend {
    fn requires_credential(&self) -> bool {
        false
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        _credential: Option<&str>
    ) -> Result<Value, RelayError> {
        info!("Forwarding {} messages to relay {}", request.messages.len(), self.url);
        post_json(&self.http, &self.url, request, None).await
    }

    fn name(&self) -> &'static str {
        "forward"
    }

    fn endpoint(&self) -> &Url {
        &self.url
    }
}
