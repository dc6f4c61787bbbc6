pub mod credentials;
pub mod error;

pub use credentials::{ CredentialSource, EnvCredential, StaticCredential };
pub use error::RelayError;

use log::{ debug, info, warn };
use serde_json::Value;
use std::sync::Arc;

use crate::llm::CompletionBackend;
use crate::models::relay::{ completion_text, CompletionRequest, RelayReply, RelayRequest };

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u64 = 800;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionDefaults {
    pub model: String,
    pub max_tokens: u64,
    pub temperature: f64,
}

impl Default for CompletionDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Validates an inbound chat payload, fills in completion defaults and makes
/// the single outbound call. Holds no per-request state, so one instance is
/// shared by every connection.
#[derive(Clone)]
pub struct RelayHandler {
    backend: Arc<dyn CompletionBackend>,
    credentials: Arc<dyn CredentialSource>,
    defaults: CompletionDefaults,
    include_raw: bool,
}

impl RelayHandler {
    pub fn new(backend: Arc<dyn CompletionBackend>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            backend,
            credentials,
            defaults: CompletionDefaults::default(),
            include_raw: true,
        }
    }

    pub fn with_defaults(mut self, defaults: CompletionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    pub fn defaults(&self) -> &CompletionDefaults {
        &self.defaults
    }

    pub fn backend(&self) -> &dyn CompletionBackend {
        self.backend.as_ref()
    }

    /// Runs everything after the method check: body parse, shape validation,
    /// credential lookup, the upstream call and reply extraction.
    pub async fn relay(&self, body: &[u8]) -> Result<RelayReply, RelayError> {
        let request = parse_request(body)?;

        let credential = if self.backend.requires_credential() {
            Some(self.credentials.api_key().ok_or(RelayError::CredentialNotConfigured)?)
        } else {
            None
        };

        let completion = build_completion(request, &self.defaults);
        debug!(
            "Relaying via {}: model={} messages={} max_tokens={} temperature={}",
            self.backend.name(),
            completion.model,
            completion.messages.len(),
            completion.max_tokens,
            completion.temperature
        );

        let json = self.backend.complete(&completion, credential.as_deref()).await?;
        let assistant = reply_text(&json);
        if assistant.is_empty() {
            warn!("Upstream response carried no assistant text");
        } else {
            info!("Relayed reply of {} chars", assistant.chars().count());
        }

        Ok(RelayReply {
            assistant,
            raw: if self.include_raw { Some(json) } else { None },
        })
    }
}

pub fn parse_request(body: &[u8]) -> Result<RelayRequest, RelayError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidBody)?;

    let messages = match payload.get("messages") {
        Some(Value::Array(items)) => items.clone(),
        _ => {
            return Err(RelayError::MissingMessages);
        }
    };

    Ok(RelayRequest {
        messages,
        model: payload
            .get("model")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        max_tokens: payload
            .get("max_tokens")
            .and_then(Value::as_u64)
            .filter(|n| *n > 0),
        temperature: payload.get("temperature").and_then(Value::as_f64),
    })
}

pub fn build_completion(request: RelayRequest, defaults: &CompletionDefaults) -> CompletionRequest {
    CompletionRequest {
        model: request.model.unwrap_or_else(|| defaults.model.clone()),
        messages: request.messages,
        max_tokens: request.max_tokens.unwrap_or(defaults.max_tokens),
        temperature: request.temperature.unwrap_or(defaults.temperature),
    }
}

/// Completion text when the payload is a chat-completions body, the
/// `assistant` field when it is another relay's envelope, or empty.
fn reply_text(json: &Value) -> String {
    completion_text(json)
        .or_else(|| json.get("assistant").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}
