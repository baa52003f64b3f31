//! End-to-end chat flow tests
//!
//! Drives the coordinator, session registry, and broadcast hub against the
//! in-memory store through real channels, the same way the WebSocket handler
//! does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use huddle_core::{Message, MessageStore, Reactions, Snowflake, StoreResult};
use huddle_db::MemoryMessageStore;
use huddle_server::chat::ChatCoordinator;
use huddle_server::protocol::{AddReactionPayload, SendMessagePayload, ServerEvent};
use huddle_server::session::{Session, SessionRegistry};

const RECV_TIMEOUT: Duration = Duration::from_millis(500);

/// A connected client: its session handle and the receiving end of its
/// outbound channel
struct TestClient {
    session: Arc<Session>,
    rx: mpsc::Receiver<ServerEvent>,
}

impl TestClient {
    async fn connect(coordinator: &ChatCoordinator, id: &str) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let session = Session::new(id.to_string(), tx);
        coordinator.handle_connect(session.clone()).await;
        Self { session, rx }
    }

    async fn recv(&mut self) -> ServerEvent {
        timeout(RECV_TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    async fn expect_load_messages(&mut self) -> Vec<Message> {
        match self.recv().await {
            ServerEvent::LoadMessages(messages) => messages,
            other => panic!("expected load-messages, got {other:?}"),
        }
    }

    async fn expect_new_message(&mut self) -> Message {
        match self.recv().await {
            ServerEvent::NewMessage(message) => message,
            other => panic!("expected new-message, got {other:?}"),
        }
    }

    async fn expect_reactions(&mut self) -> (Snowflake, Reactions) {
        match self.recv().await {
            ServerEvent::ReactionUpdated(payload) => (payload.message_id, payload.reactions),
            other => panic!("expected reaction-updated, got {other:?}"),
        }
    }

    fn expect_nothing(&mut self) {
        assert!(
            self.rx.try_recv().is_err(),
            "expected no pending event for this session"
        );
    }
}

fn coordinator_with(store: Arc<dyn MessageStore>) -> ChatCoordinator {
    ChatCoordinator::new(store, SessionRegistry::new_shared())
}

fn send_payload(text: &str, sender: &str) -> SendMessagePayload {
    SendMessagePayload {
        text: text.to_string(),
        sender: sender.to_string(),
    }
}

fn reaction_payload(message_id: Snowflake, emoji: &str, username: &str) -> AddReactionPayload {
    AddReactionPayload {
        message_id,
        emoji: emoji.to_string(),
        username: username.to_string(),
    }
}

// ============================================================================
// Connect / history replay
// ============================================================================

#[tokio::test]
async fn connect_replays_empty_history() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let history = alice.expect_load_messages().await;

    assert!(history.is_empty());
    assert_eq!(coordinator.registry().count(), 1);
}

#[tokio::test]
async fn connect_replays_prior_messages_oldest_first() {
    let store = Arc::new(MemoryMessageStore::new());
    store.append("first", "alice").await.unwrap();
    store.append("second", "bob").await.unwrap();

    let coordinator = coordinator_with(store);
    let mut carol = TestClient::connect(&coordinator, "carol").await;

    let history = carol.expect_load_messages().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "first");
    assert_eq!(history[1].text, "second");
    assert!(history[0].created_at <= history[1].created_at);
}

#[tokio::test]
async fn history_replay_goes_only_to_the_new_session() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    alice.expect_load_messages().await;

    let mut bob = TestClient::connect(&coordinator, "bob").await;
    bob.expect_load_messages().await;

    alice.expect_nothing();
}

// ============================================================================
// send-message
// ============================================================================

#[tokio::test]
async fn send_message_broadcasts_to_all_sessions() {
    let store = Arc::new(MemoryMessageStore::new());
    let coordinator = coordinator_with(store.clone());

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    alice.expect_load_messages().await;
    bob.expect_load_messages().await;

    coordinator
        .handle_send_message(&alice.session, send_payload("hi", "alice"))
        .await;

    for client in [&mut alice, &mut bob] {
        let message = client.expect_new_message().await;
        assert_eq!(message.text, "hi");
        assert_eq!(message.sender, "alice");
        assert!(message.reactions.is_empty());
    }

    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn send_message_records_session_display_name() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    alice.expect_load_messages().await;
    assert!(alice.session.name().await.is_none());

    coordinator
        .handle_send_message(&alice.session, send_payload("hi", "alice"))
        .await;

    assert_eq!(alice.session.name().await, Some("alice".to_string()));
}

#[tokio::test]
async fn empty_text_is_rejected_before_persistence() {
    let store = Arc::new(MemoryMessageStore::new());
    let coordinator = coordinator_with(store.clone());

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    alice.expect_load_messages().await;
    bob.expect_load_messages().await;

    coordinator
        .handle_send_message(&alice.session, send_payload("   ", "alice"))
        .await;

    match alice.recv().await {
        ServerEvent::Error(payload) => assert_eq!(payload.code, "VALIDATION_ERROR"),
        other => panic!("expected error event, got {other:?}"),
    }

    // The failed send reaches no one else and nothing is stored
    bob.expect_nothing();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn empty_sender_is_rejected_before_persistence() {
    let store = Arc::new(MemoryMessageStore::new());
    let coordinator = coordinator_with(store.clone());

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    alice.expect_load_messages().await;

    coordinator
        .handle_send_message(&alice.session, send_payload("hi", ""))
        .await;

    match alice.recv().await {
        ServerEvent::Error(payload) => assert_eq!(payload.code, "VALIDATION_ERROR"),
        other => panic!("expected error event, got {other:?}"),
    }
    assert!(store.is_empty().await);
}

// ============================================================================
// add-reaction
// ============================================================================

#[tokio::test]
async fn reaction_toggle_on_then_off() {
    let store = Arc::new(MemoryMessageStore::new());
    let message = store.append("hi", "alice").await.unwrap();

    let coordinator = coordinator_with(store.clone());
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    bob.expect_load_messages().await;

    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "bob"))
        .await;

    let (id, reactions) = bob.expect_reactions().await;
    assert_eq!(id, message.id);
    assert_eq!(reactions.users("👍"), Some(&["bob".to_string()][..]));

    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "bob"))
        .await;

    let (_, reactions) = bob.expect_reactions().await;
    assert!(reactions.is_empty());

    let stored = store.find_by_id(message.id).await.unwrap().unwrap();
    assert!(stored.reactions.is_empty());
}

#[tokio::test]
async fn reaction_accumulates_users_in_toggle_order() {
    let store = Arc::new(MemoryMessageStore::new());
    let message = store.append("hi", "alice").await.unwrap();

    let coordinator = coordinator_with(store.clone());
    let mut alice = TestClient::connect(&coordinator, "alice").await;
    alice.expect_load_messages().await;

    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "bob"))
        .await;
    alice.expect_reactions().await;

    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "carol"))
        .await;
    let (_, reactions) = alice.expect_reactions().await;
    assert_eq!(
        reactions.users("👍"),
        Some(&["bob".to_string(), "carol".to_string()][..])
    );

    // bob toggles off, carol remains
    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "bob"))
        .await;
    let (_, reactions) = alice.expect_reactions().await;
    assert_eq!(reactions.users("👍"), Some(&["carol".to_string()][..]));
}

#[tokio::test]
async fn reaction_for_unknown_message_is_a_silent_no_op() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    alice.expect_load_messages().await;

    coordinator
        .handle_toggle_reaction(reaction_payload(Snowflake::new(999), "👍", "bob"))
        .await;

    // No broadcast, no error
    alice.expect_nothing();
}

// ============================================================================
// Failure policy
// ============================================================================

/// Store double whose writes can be switched to fail
struct FlakyStore {
    inner: MemoryMessageStore,
    fail_append: AtomicBool,
    fail_replace: AtomicBool,
}

impl FlakyStore {
    fn new(inner: MemoryMessageStore) -> Self {
        Self {
            inner,
            fail_append: AtomicBool::new(false),
            fail_replace: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MessageStore for FlakyStore {
    async fn append(&self, text: &str, sender: &str) -> StoreResult<Message> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(huddle_core::DomainError::storage("connection refused"));
        }
        self.inner.append(text, sender).await
    }

    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<Message>> {
        self.inner.list_recent(limit).await
    }

    async fn find_by_id(&self, id: Snowflake) -> StoreResult<Option<Message>> {
        self.inner.find_by_id(id).await
    }

    async fn replace_reactions(&self, id: Snowflake, reactions: &Reactions) -> StoreResult<()> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(huddle_core::DomainError::storage("connection refused"));
        }
        self.inner.replace_reactions(id, reactions).await
    }
}

#[tokio::test]
async fn append_failure_unicasts_error_to_sender_only() {
    let store = Arc::new(FlakyStore::new(MemoryMessageStore::new()));
    store.fail_append.store(true, Ordering::SeqCst);

    let coordinator = coordinator_with(store);
    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    alice.expect_load_messages().await;
    bob.expect_load_messages().await;

    coordinator
        .handle_send_message(&alice.session, send_payload("hi", "alice"))
        .await;

    match alice.recv().await {
        ServerEvent::Error(payload) => assert_eq!(payload.code, "STORAGE_ERROR"),
        other => panic!("expected error event, got {other:?}"),
    }
    bob.expect_nothing();
}

#[tokio::test]
async fn reaction_write_failure_is_absorbed() {
    let inner = MemoryMessageStore::new();
    let message = inner.append("hi", "alice").await.unwrap();

    let store = Arc::new(FlakyStore::new(inner));
    store.fail_replace.store(true, Ordering::SeqCst);

    let coordinator = coordinator_with(store.clone());
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    bob.expect_load_messages().await;

    coordinator
        .handle_toggle_reaction(reaction_payload(message.id, "👍", "bob"))
        .await;

    // No broadcast and no error event reaches any client
    bob.expect_nothing();

    let stored = store.find_by_id(message.id).await.unwrap().unwrap();
    assert!(stored.reactions.is_empty());
}

// ============================================================================
// Ordering and disconnect
// ============================================================================

#[tokio::test]
async fn broadcasts_arrive_in_publish_order_for_every_session() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    alice.expect_load_messages().await;
    bob.expect_load_messages().await;

    for i in 0..5 {
        coordinator
            .handle_send_message(&alice.session, send_payload(&format!("msg {i}"), "alice"))
            .await;
    }

    for client in [&mut alice, &mut bob] {
        for i in 0..5 {
            let message = client.expect_new_message().await;
            assert_eq!(message.text, format!("msg {i}"));
        }
    }
}

#[tokio::test]
async fn disconnected_session_receives_nothing_further() {
    let coordinator = coordinator_with(Arc::new(MemoryMessageStore::new()));

    let mut alice = TestClient::connect(&coordinator, "alice").await;
    let mut bob = TestClient::connect(&coordinator, "bob").await;
    alice.expect_load_messages().await;
    bob.expect_load_messages().await;
    assert_eq!(coordinator.registry().count(), 2);

    coordinator.handle_disconnect(bob.session.id()).await;
    assert_eq!(coordinator.registry().count(), 1);

    coordinator
        .handle_send_message(&alice.session, send_payload("hi", "alice"))
        .await;

    alice.expect_new_message().await;
    bob.expect_nothing();
}
