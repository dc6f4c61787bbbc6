use serde::{ Serialize, Deserialize };
use serde_json::Value;

/// Inbound relay payload after validation. Message entries are forwarded
/// to the upstream untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct RelayRequest {
    pub messages: Vec<Value>,
    pub model: Option<String>,
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
}

/// Body sent to the completion endpoint once defaults are applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    pub max_tokens: u64,
    pub temperature: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelayReply {
    pub assistant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Pulls the assistant text out of a chat-completions payload, falling back
/// to the legacy `text` field of the first choice.
pub fn completion_text(json: &Value) -> Option<&str> {
    let first = json.get("choices").and_then(|c| c.get(0))?;
    non_empty_str(first.pointer("/message/content")).or_else(|| non_empty_str(first.get("text")))
}

/// Reply text for any payload shape a relay may return: its own envelope
/// or a raw chat-completions body, plus the ad-hoc `reply`/`content` keys
/// some deployments use.
pub fn extract_reply(json: &Value) -> Option<&str> {
    non_empty_str(json.get("assistant"))
        .or_else(|| completion_text(json))
        .or_else(|| non_empty_str(json.get("reply")))
        .or_else(|| non_empty_str(json.get("content")))
}
