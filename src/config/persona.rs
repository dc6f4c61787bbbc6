use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful L'Oréal beauty assistant. You can answer questions about L'Oréal products, skincare routines, haircare, fragrances, and makeup. If asked about unrelated topics, politely decline.";
pub const DEFAULT_GREETING: &str =
    "👋 Hello! I'm the L'Oréal assistant. Ask me about products, routines, or ingredients.";
pub const DEFAULT_THINKING: &str = "Thinking...";
pub const DEFAULT_REFUSAL: &str =
    "I'm sorry, I can only answer questions related to L'Oréal and beauty.";
pub const DEFAULT_EMPTY_REPLY: &str =
    "(Demo) I can't reach your API endpoint or it returned no reply. Confirm the worker is deployed and OPENAI_API_KEY is set.";
pub const DEFAULT_ERROR_REPLY: &str =
    "(Demo) Unable to reach API. Update API_ENDPOINT to your deployed worker or server. Example answer: L'Oréal offers targeted serums to hydrate skin and improve texture.";
pub const DEFAULT_OFF_TOPIC_TERMS: &[&str] = &[
    "politics",
    "president",
    "election",
    "stock",
    "crypto",
    "bitcoin",
    "porn",
    "torrent",
    "torrenting",
];

#[derive(Debug)]
pub enum PersonaError {
    EmptyField(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaError::EmptyField(field) => write!(f, "Persona field '{}' must not be empty", field),
            PersonaError::IoError(e) => write!(f, "Persona file IO error: {}", e),
            PersonaError::JsonError(e) => write!(f, "Persona JSON parsing error: {}", e),
        }
    }
}

impl Error for PersonaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersonaError::IoError(e) => Some(e),
            PersonaError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersonaError {
    fn from(err: std::io::Error) -> Self {
        PersonaError::IoError(err)
    }
}

impl From<serde_json::Error> for PersonaError {
    fn from(err: serde_json::Error) -> Self {
        PersonaError::JsonError(err)
    }
}

/// Everything the chat client says on its own: the system prompt sent with
/// every request, the greeting, and the fixed replies used in place of a
/// model answer. Missing keys in a persona file keep their defaults.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Persona {
    pub system_prompt: String,
    pub greeting: String,
    pub thinking: String,
    pub refusal: String,
    pub empty_reply: String,
    pub error_reply: String,
    pub off_topic_terms: Vec<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            thinking: DEFAULT_THINKING.to_string(),
            refusal: DEFAULT_REFUSAL.to_string(),
            empty_reply: DEFAULT_EMPTY_REPLY.to_string(),
            error_reply: DEFAULT_ERROR_REPLY.to_string(),
            off_topic_terms: DEFAULT_OFF_TOPIC_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Persona {
    fn validate(&self) -> Result<(), PersonaError> {
        let required = [
            ("system_prompt", &self.system_prompt),
            ("refusal", &self.refusal),
            ("empty_reply", &self.empty_reply),
            ("error_reply", &self.error_reply),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PersonaError::EmptyField(name));
            }
        }
        Ok(())
    }
}

pub fn parse_persona(json: &str) -> Result<Persona, PersonaError> {
    let persona: Persona = serde_json::from_str(json)?;
    persona.validate()?;
    Ok(persona)
}

pub fn load_persona<P: AsRef<Path>>(path: P) -> Result<Persona, PersonaError> {
    let content = fs::read_to_string(&path)?;
    let persona = parse_persona(&content)?;
    info!(
        "Loaded persona from {} ({} off-topic terms)",
        path.as_ref().display(),
        persona.off_topic_terms.len()
    );
    Ok(persona)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let persona = parse_persona(
            r#"{ "system_prompt": "You are a gardening assistant.", "off_topic_terms": ["cars"] }"#
        ).unwrap();
        assert_eq!(persona.system_prompt, "You are a gardening assistant.");
        assert_eq!(persona.off_topic_terms, vec!["cars".to_string()]);
        assert_eq!(persona.refusal, DEFAULT_REFUSAL);
        assert_eq!(persona.thinking, DEFAULT_THINKING);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(parse_persona("{}").unwrap(), Persona::default());
    }

    #[test]
    fn rejects_blank_required_field() {
        let err = parse_persona(r#"{ "refusal": "  " }"#).unwrap_err();
        assert!(matches!(err, PersonaError::EmptyField("refusal")));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(parse_persona("{ nope"), Err(PersonaError::JsonError(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_persona("/definitely/not/here/persona.json").unwrap_err();
        assert!(matches!(err, PersonaError::IoError(_)));
        assert!(err.source().is_some());
    }
}
