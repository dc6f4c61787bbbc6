use std::env;

/// Where the relay gets the upstream API key. Looked up on every
/// invocation, so a rotated secret is picked up without a restart.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// A fixed value, or none at all.
#[derive(Clone, Debug, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|k| !k.trim().is_empty())
    }
}

/// Reads a named environment variable.
#[derive(Clone, Debug)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credential_treats_blank_as_missing() {
        assert_eq!(StaticCredential::new("sk-test").api_key().as_deref(), Some("sk-test"));
        assert_eq!(StaticCredential::new("  ").api_key(), None);
        assert_eq!(StaticCredential::missing().api_key(), None);
    }

    #[test]
    fn env_credential_reads_at_call_time() {
        let var = "CHAT_RELAY_TEST_CREDENTIAL_READ";
        let source = EnvCredential::new(var);
        env::remove_var(var);
        assert_eq!(source.api_key(), None);

        env::set_var(var, "sk-rotated");
        assert_eq!(source.api_key().as_deref(), Some("sk-rotated"));

        env::set_var(var, "");
        assert_eq!(source.api_key(), None);
        env::remove_var(var);
    }
}
