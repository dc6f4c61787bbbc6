use chat_relay::cli::ClientArgs;
use chat_relay::client::{
    ChatView,
    ConversationManager,
    HttpRelayTransport,
    KeywordFilter,
    TerminalView,
};
use chat_relay::config::persona::{ load_persona, Persona };
use clap::Parser;
use dotenv::dotenv;
use log::info;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{ AsyncBufReadExt, BufReader };

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ClientArgs::parse();

    let persona = match &args.persona_path {
        Some(path) => load_persona(path)?,
        None => Persona::default(),
    };
    let transport = HttpRelayTransport::new(
        &args.endpoint,
        args.timeout_secs.map(Duration::from_secs)
    )?;
    info!("Chatting with relay at {}", transport.endpoint());

    let filter = KeywordFilter::new(&persona.off_topic_terms);
    let mut manager = ConversationManager::new(
        persona,
        Arc::new(transport),
        Arc::new(filter),
        TerminalView::stdout()
    ).with_history_window(args.history_window);

    manager.greet();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }
        manager.submit_user_message(&line).await;
        // blank lines are ignored without re-prompting
        if line.trim().is_empty() {
            manager.view_mut().focus_input();
        }
    }

    Ok(())
}
