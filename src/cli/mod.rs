use clap::Parser;

/// Relay server configuration.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the relay to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8787")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Upstream Args ---
    /// How the relay reaches the model: "upstream" calls the completion API
    /// directly, "forward" hands the request to another relay instance.
    #[arg(long, env = "RELAY_MODE", default_value = "upstream")]
    pub relay_mode: String,

    /// Chat completions endpoint used in upstream mode.
    #[arg(long, env = "UPSTREAM_URL", default_value = "https://api.openai.com/v1/chat/completions")]
    pub upstream_url: String,

    /// Relay endpoint used in forward mode.
    #[arg(long, env = "FORWARD_URL")]
    pub forward_url: Option<String>,

    /// Name of the environment variable holding the upstream API key.
    /// The variable is read on every request, never at startup.
    #[arg(long, env = "API_KEY_ENV", default_value = "OPENAI_API_KEY")]
    pub api_key_env: String,

    /// Seconds to wait for the upstream before giving up. Unset means no limit.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    // --- Completion Defaults ---
    /// Model used when the client does not name one.
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub chat_model: String,

    /// max_tokens used when the client does not send a positive integer.
    #[arg(long, env = "MAX_TOKENS", default_value = "800")]
    pub max_tokens: u64,

    /// temperature used when the client does not send a number.
    #[arg(long, env = "TEMPERATURE", default_value = "0.2")]
    pub temperature: f64,

    /// Include the full upstream JSON as `raw` in successful replies.
    #[arg(long, env = "INCLUDE_RAW", default_value = "true", action = clap::ArgAction::Set)]
    pub include_raw: bool,
}

/// Terminal chat client configuration.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chat with a relay from the terminal", long_about = None)]
pub struct ClientArgs {
    /// Relay endpoint the client posts conversations to.
    #[arg(long, env = "RELAY_ENDPOINT", default_value = "http://127.0.0.1:8787")]
    pub endpoint: String,

    /// Optional persona file (JSON) overriding the built-in assistant persona.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    /// Number of most recent turns sent along with the system prompt.
    #[arg(long, env = "HISTORY_WINDOW", default_value = "16")]
    pub history_window: usize,

    /// Seconds to wait for a reply before showing the fallback. Unset means no limit.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_defaults() {
        let args = Args::try_parse_from(["chat-relay"]).unwrap();
        assert_eq!(args.relay_mode, "upstream");
        assert_eq!(args.api_key_env, "OPENAI_API_KEY");
        assert_eq!(args.max_tokens, 800);
        assert!(args.include_raw);
        assert!(args.upstream_timeout_secs.is_none());
    }

    #[test]
    fn relay_flags() {
        let args = Args::try_parse_from([
            "chat-relay",
            "--relay-mode",
            "forward",
            "--forward-url",
            "http://10.0.0.2:8787",
            "--include-raw",
            "false",
            "--upstream-timeout-secs",
            "30",
        ]).unwrap();
        assert_eq!(args.relay_mode, "forward");
        assert_eq!(args.forward_url.as_deref(), Some("http://10.0.0.2:8787"));
        assert!(!args.include_raw);
        assert_eq!(args.upstream_timeout_secs, Some(30));
    }

    #[test]
    fn client_flags() {
        let args = ClientArgs::try_parse_from(["chat-client", "--history-window", "4"]).unwrap();
        assert_eq!(args.history_window, 4);
        assert!(args.persona_path.is_none());
    }
}
