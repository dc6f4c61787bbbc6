//! Conversation manager talking over HTTP to a live relay whose upstream is mocked.

use chat_relay::client::{
    ChatView,
    ConversationManager,
    FallbackReason,
    HttpRelayTransport,
    KeywordFilter,
    MessageId,
    Speaker,
    SubmitOutcome,
};
use chat_relay::config::persona::Persona;
use chat_relay::llm::{ new_backend, BackendConfig, UpstreamMode };
use chat_relay::models::chat::Role;
use chat_relay::relay::{ RelayHandler, StaticCredential };
use chat_relay::server::api::router;
use serde_json::{ json, Value };
use std::net::SocketAddr;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{ method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

#[derive(Default)]
struct PageView {
    bubbles: Vec<(Speaker, String)>,
    input_enabled: bool,
}

impl ChatView for PageView {
    fn render(&mut self, speaker: Speaker, text: &str) -> MessageId {
        self.bubbles.push((speaker, text.to_string()));
        MessageId(self.bubbles.len() - 1)
    }

    fn replace(&mut self, id: MessageId, text: &str) {
        self.bubbles[id.0].1 = text.to_string();
    }

    fn clear_input(&mut self) {}

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {}

    fn scroll_to_latest(&mut self) {}
}

async fn spawn_relay(upstream: &MockServer, key: Option<&str>) -> SocketAddr {
    let backend = new_backend(
        &(BackendConfig {
            mode: UpstreamMode::Upstream,
            url: Url::parse(&format!("{}/v1/chat/completions", upstream.uri())).unwrap(),
            timeout: None,
        })
    ).unwrap();
    let credentials = match key {
        Some(k) => StaticCredential::new(k),
        None => StaticCredential::missing(),
    };
    let app = router(Arc::new(RelayHandler::new(backend, Arc::new(credentials))));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn manager_for(addr: SocketAddr) -> ConversationManager<PageView> {
    let transport = HttpRelayTransport::new(&format!("http://{}/", addr), None).unwrap();
    ConversationManager::new(
        Persona::default(),
        Arc::new(transport),
        Arc::new(KeywordFilter::default()),
        PageView { input_enabled: true, ..Default::default() }
    )
}

#[tokio::test]
async fn moisturizer_question_round_trip() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                json!({ "choices": [{ "message": { "role": "assistant", "content": "Try a hydrating serum." } }] })
            )
        )
        .expect(1)
        .mount(&upstream).await;

    let addr = spawn_relay(&upstream, Some("sk-test")).await;
    let mut manager = manager_for(addr);
    let before = manager.conversation().len();

    let outcome = manager.submit_user_message("What is a good moisturizer?").await;

    assert_eq!(outcome, SubmitOutcome::Replied);
    assert_eq!(manager.conversation().len(), before + 2);
    assert_eq!(manager.conversation().last().unwrap().content(), "Try a hydrating serum.");
    assert_eq!(
        manager.view().bubbles,
        vec![
            (Speaker::User, "What is a good moisturizer?".to_string()),
            (Speaker::Assistant, "Try a hydrating serum.".to_string())
        ]
    );
    assert!(manager.view().input_enabled);

    let received = upstream.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1], json!({ "role": "user", "content": "What is a good moisturizer?" }));
}

#[tokio::test]
async fn off_topic_never_leaves_the_client() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream).await;

    let addr = spawn_relay(&upstream, Some("sk-test")).await;
    let mut manager = manager_for(addr);

    let outcome = manager.submit_user_message("what about BITCOIN prices").await;
    assert_eq!(outcome, SubmitOutcome::Refused);
    let turns = manager.conversation().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].role(), Role::User);
    assert_eq!(turns[2].content(), Persona::default().refusal);
}

#[tokio::test]
async fn relay_failure_becomes_synthetic_fallback() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream).await;

    // no credential: the relay answers 500
    let addr = spawn_relay(&upstream, None).await;
    let mut manager = manager_for(addr);

    let outcome = manager.submit_user_message("Best sunscreen for oily skin?").await;
    assert_eq!(outcome, SubmitOutcome::Fallback(FallbackReason::Failed));

    let last = manager.conversation().last().unwrap();
    assert!(last.is_synthetic());
    assert_eq!(last.content(), Persona::default().error_reply);
    assert_eq!(manager.view().bubbles.last().unwrap().1, Persona::default().error_reply);
    assert!(manager.view().input_enabled);
}

#[tokio::test]
async fn empty_completion_becomes_empty_reply_fallback() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&upstream).await;

    let addr = spawn_relay(&upstream, Some("sk-test")).await;
    let mut manager = manager_for(addr);

    let outcome = manager.submit_user_message("Any tips for dry hair?").await;
    assert_eq!(outcome, SubmitOutcome::Fallback(FallbackReason::EmptyReply));
    assert_eq!(manager.conversation().last().unwrap().content(), Persona::default().empty_reply);
}
