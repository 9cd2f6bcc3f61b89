use std::sync::{Arc, Mutex};
use std::time::Duration;

use pprovider::{Message, ProviderId, ToolDefinition};
use psession::prelude::*;
use serde_json::json;

#[derive(Debug, Default)]
struct EvictionLog {
    events: Mutex<Vec<(SessionId, EvictionReason)>>,
}

impl SessionStoreHooks for EvictionLog {
    fn on_session_evicted(&self, id: &SessionId, reason: EvictionReason) {
        self.events
            .lock()
            .expect("events lock")
            .push((id.clone(), reason));
    }
}

fn store(capacity: usize) -> (SessionStore, Arc<ManualClock>, Arc<EvictionLog>) {
    let clock = Arc::new(ManualClock::new(0));
    let log = Arc::new(EvictionLog::default());
    let store = SessionStore::new(SessionStoreConfig::default().with_capacity(capacity))
        .with_clock(clock.clone())
        .with_hooks(log.clone());
    (store, clock, log)
}

#[test]
fn inserting_past_capacity_keeps_exactly_capacity_sessions() {
    let (store, clock, log) = store(200);
    let mut ids = Vec::new();
    for _ in 0..201 {
        ids.push(
            store
                .create(CreateSession::new(ProviderId::OpenAi, "gpt-4o-mini"))
                .expect("create")
                .id,
        );
        clock.advance(Duration::from_millis(10));
    }

    let active = store.list_active().expect("list");
    assert_eq!(active.len(), 200);
    assert_eq!(active[0].id, ids[1]);
    assert_eq!(active[199].id, ids[200]);

    let events = log.events.lock().expect("events lock").clone();
    assert_eq!(events, vec![(ids[0].clone(), EvictionReason::Capacity)]);
}

#[test]
fn ttl_expiry_is_reported_before_capacity() {
    let (store, clock, log) = store(1);
    let stale = store
        .create(CreateSession::new(ProviderId::Anthropic, "claude-haiku-4-5"))
        .expect("create")
        .id;

    clock.advance(Duration::from_secs(31 * 60));
    let fresh = store
        .create(CreateSession::new(ProviderId::Anthropic, "claude-haiku-4-5"))
        .expect("create")
        .id;

    assert!(store.get(&fresh).is_ok());
    assert_eq!(
        store.get(&stale).expect_err("stale").kind,
        SessionErrorKind::NotFound
    );
    assert_eq!(
        log.events.lock().expect("events lock").clone(),
        vec![(stale, EvictionReason::Expired)]
    );
}

#[test]
fn snapshot_serializes_with_camel_case_fields() {
    let (store, clock, _) = store(10);
    let created = store
        .create(
            CreateSession::new(ProviderId::Google, "gemini-2.5-flash")
                .with_system_prompt("Draw when asked.")
                .with_tools(vec![ToolDefinition::new("openCanvas")]),
        )
        .expect("create");
    let handle = store.get(&created.id).expect("get");

    clock.advance(Duration::from_millis(250));
    store
        .queue_instructions(&handle, vec!["use blue".to_string()])
        .expect("queue");
    store
        .queue_tool_outputs(&handle, vec![ToolOutput::new("call_1", "opened")])
        .expect("queue");
    store
        .append_messages(&handle, &[Message::user("draw a cat")])
        .expect("append");

    let value = serde_json::to_value(store.serialize(&handle).expect("snapshot"))
        .expect("snapshot should encode");

    assert_eq!(value["provider"], "google");
    assert_eq!(value["queuedInstructions"], json!(["use blue"]));
    assert_eq!(
        value["queuedToolOutputs"],
        json!([{"callId": "call_1", "output": "opened", "addedAt": 250}])
    );
    assert_eq!(value["tools"][0]["name"], "openCanvas");
    assert_eq!(value["createdAt"], 0);
    assert_eq!(value["updatedAt"], 250);
    assert_eq!(value["defaults"], json!({}));
    assert_eq!(value["messages"][0]["role"], "system");
}

#[tokio::test]
async fn concurrent_turns_on_one_session_never_interleave() {
    let (store, _, _) = store(10);
    let store = Arc::new(store);
    let id = store
        .create(CreateSession::new(ProviderId::Ollama, "gpt-oss:20b"))
        .expect("create")
        .id;

    let mut tasks = Vec::new();
    for turn in 0..8 {
        let store = Arc::clone(&store);
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            let handle = store.get(&id).expect("get");
            let _turn = handle.lock_turn().await;
            store
                .append_messages(&handle, &[Message::user(format!("q{turn}"))])
                .expect("append");
            tokio::task::yield_now().await;
            store
                .append_messages(&handle, &[Message::assistant(format!("a{turn}"))])
                .expect("append");
        }));
    }
    for task in tasks {
        task.await.expect("turn task");
    }

    let messages = store
        .serialize(&store.get(&id).expect("get"))
        .expect("snapshot")
        .messages;
    assert_eq!(messages.len(), 16);
    for pair in messages.chunks(2) {
        assert_eq!(pair[0].content[1..], pair[1].content[1..]);
    }
}
