//! Process-scoped session storage with lazy TTL and capacity eviction.
//!
//! ```rust
//! use pprovider::{Message, ProviderId};
//! use psession::{CreateSession, SessionStore, SessionStoreConfig};
//!
//! let store = SessionStore::new(SessionStoreConfig::default());
//! let created = store
//!     .create(CreateSession::new(ProviderId::Ollama, "gpt-oss:20b").with_system_prompt("Be brief."))
//!     .expect("session should be created");
//!
//! let handle = store.get(&created.id).expect("session should exist");
//! store
//!     .append_messages(&handle, &[Message::user("hello")])
//!     .expect("append should succeed");
//!
//! assert_eq!(store.serialize(&handle).expect("snapshot").messages.len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use pcommon::{Clock, GenerationOptions, SessionId, SystemClock, Timestamp};
use pprovider::{Message, ProviderId, ToolDefinition};

use crate::{
    CreateSession, EvictionReason, NoopSessionStoreHooks, QueuedToolOutput, SessionError,
    SessionSnapshot, SessionStoreConfig, SessionStoreHooks, ToolOutput, validate_defaults,
};

/// Held for the duration of one read, generate, append cycle on a session.
pub type TurnGuard = tokio::sync::OwnedMutexGuard<()>;

#[derive(Debug)]
struct SessionState {
    provider: ProviderId,
    model: String,
    messages: Vec<Message>,
    queued_instructions: Vec<String>,
    queued_tool_outputs: Vec<QueuedToolOutput>,
    defaults: GenerationOptions,
    tools: Option<Vec<ToolDefinition>>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl SessionState {
    fn snapshot(&self, id: &SessionId) -> SessionSnapshot {
        SessionSnapshot {
            id: id.clone(),
            provider: self.provider,
            model: self.model.clone(),
            messages: self.messages.clone(),
            queued_instructions: self.queued_instructions.clone(),
            queued_tool_outputs: self.queued_tool_outputs.clone(),
            defaults: self.defaults,
            tools: self.tools.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    id: SessionId,
    state: Mutex<SessionState>,
    turn: Arc<tokio::sync::Mutex<()>>,
}

/// Shared reference to one stored session.
///
/// Handles stay usable after the session is deleted or evicted, but changes
/// made through them are no longer visible to the store.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    entry: Arc<SessionEntry>,
}

impl SessionHandle {
    pub fn id(&self) -> &SessionId {
        &self.entry.id
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(self.state()?.snapshot(&self.entry.id))
    }

    /// Waits for exclusive use of the session across awaits.
    pub async fn lock_turn(&self) -> TurnGuard {
        Arc::clone(&self.entry.turn).lock_owned().await
    }

    fn state(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.entry
            .state
            .lock()
            .map_err(|_| SessionError::store("session state lock poisoned"))
    }

    fn updated_at(&self) -> Result<Timestamp, SessionError> {
        Ok(self.state()?.updated_at)
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    config: SessionStoreConfig,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn SessionStoreHooks>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionStoreConfig::default())
    }
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            config,
            clock: Arc::new(SystemClock),
            hooks: Arc::new(NoopSessionStoreHooks),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn SessionStoreHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> SessionStoreConfig {
        self.config
    }

    pub fn create(&self, request: CreateSession) -> Result<SessionSnapshot, SessionError> {
        let model = request.model.trim();
        if model.is_empty() {
            return Err(SessionError::validation("Model is required"));
        }
        validate_defaults(&request.defaults)?;

        let now = self.clock.now_millis();
        let mut messages = Vec::with_capacity(request.initial_messages.len() + 1);
        if let Some(system_prompt) = request
            .system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
        {
            messages.push(Message::system(system_prompt));
        }
        messages.extend(request.initial_messages);

        let id = SessionId::new(uuid::Uuid::new_v4().to_string());
        let state = SessionState {
            provider: request.provider,
            model: model.to_string(),
            messages,
            queued_instructions: Vec::new(),
            queued_tool_outputs: Vec::new(),
            defaults: request.defaults,
            tools: request.tools.filter(|tools| !tools.is_empty()),
            created_at: now,
            updated_at: now,
        };
        let snapshot = state.snapshot(&id);
        let handle = SessionHandle {
            entry: Arc::new(SessionEntry {
                id: id.clone(),
                state: Mutex::new(state),
                turn: Arc::new(tokio::sync::Mutex::new(())),
            }),
        };

        let evicted = {
            let mut sessions = self.sessions()?;
            let evicted = self.sweep(&mut sessions)?;
            sessions.insert(id.clone(), handle);
            evicted
        };
        self.report_evictions(&evicted);
        self.hooks
            .on_session_created(&id, snapshot.provider, &snapshot.model);

        Ok(snapshot)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        let (found, evicted) = {
            let mut sessions = self.sessions()?;
            let evicted = self.sweep(&mut sessions)?;
            (sessions.get(id).cloned(), evicted)
        };
        self.report_evictions(&evicted);

        found.ok_or_else(|| SessionError::not_found(id))
    }

    /// Returns `true` when a session was removed.
    pub fn delete(&self, id: &SessionId) -> Result<bool, SessionError> {
        let removed = self.sessions()?.remove(id).is_some();
        if removed {
            self.hooks.on_session_deleted(id);
        }
        Ok(removed)
    }

    pub fn append_messages(
        &self,
        handle: &SessionHandle,
        messages: &[Message],
    ) -> Result<(), SessionError> {
        let mut state = handle.state()?;
        state.messages.extend_from_slice(messages);
        state.updated_at = self.clock.now_millis();
        Ok(())
    }

    pub fn queue_instructions(
        &self,
        handle: &SessionHandle,
        instructions: Vec<String>,
    ) -> Result<(), SessionError> {
        if instructions.is_empty() {
            return Ok(());
        }

        let mut state = handle.state()?;
        state.queued_instructions.extend(instructions);
        state.updated_at = self.clock.now_millis();
        Ok(())
    }

    pub fn queue_tool_outputs(
        &self,
        handle: &SessionHandle,
        outputs: Vec<ToolOutput>,
    ) -> Result<(), SessionError> {
        if outputs.is_empty() {
            return Ok(());
        }

        let now = self.clock.now_millis();
        let mut state = handle.state()?;
        state
            .queued_tool_outputs
            .extend(outputs.into_iter().map(|output| QueuedToolOutput {
                call_id: output.call_id,
                output: output.output,
                added_at: now,
            }));
        state.updated_at = now;
        Ok(())
    }

    pub fn clear_queues(&self, handle: &SessionHandle) -> Result<(), SessionError> {
        let mut state = handle.state()?;
        if state.queued_instructions.is_empty() && state.queued_tool_outputs.is_empty() {
            return Ok(());
        }

        state.queued_instructions.clear();
        state.queued_tool_outputs.clear();
        state.updated_at = self.clock.now_millis();
        Ok(())
    }

    /// Merges `partial` into the session defaults; unset fields are kept.
    pub fn update_defaults(
        &self,
        handle: &SessionHandle,
        partial: GenerationOptions,
    ) -> Result<(), SessionError> {
        validate_defaults(&partial)?;

        let mut state = handle.state()?;
        state.defaults.merge(partial);
        state.updated_at = self.clock.now_millis();
        Ok(())
    }

    pub fn serialize(&self, handle: &SessionHandle) -> Result<SessionSnapshot, SessionError> {
        handle.snapshot()
    }

    /// Snapshots of every live session, oldest first.
    pub fn list_active(&self) -> Result<Vec<SessionSnapshot>, SessionError> {
        let (handles, evicted) = {
            let mut sessions = self.sessions()?;
            let evicted = self.sweep(&mut sessions)?;
            (sessions.values().cloned().collect::<Vec<_>>(), evicted)
        };
        self.report_evictions(&evicted);

        let mut snapshots = handles
            .iter()
            .map(SessionHandle::snapshot)
            .collect::<Result<Vec<_>, _>>()?;
        snapshots.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(snapshots)
    }

    /// Number of stored sessions, including any the next sweep would evict.
    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.sessions()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }

    /// Drops every session. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, SessionError> {
        let mut sessions = self.sessions()?;
        let removed = sessions.len();
        sessions.clear();
        Ok(removed)
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionHandle>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::store("session store lock poisoned"))
    }

    fn sweep(
        &self,
        sessions: &mut HashMap<SessionId, SessionHandle>,
    ) -> Result<Vec<(SessionId, EvictionReason)>, SessionError> {
        let ttl_millis = u64::try_from(self.config.ttl.as_millis()).unwrap_or(u64::MAX);
        let threshold = self.clock.now_millis().saturating_sub(ttl_millis);

        let mut live = Vec::with_capacity(sessions.len());
        let mut evicted = Vec::new();
        for (id, handle) in sessions.iter() {
            let updated_at = handle.updated_at()?;
            if updated_at < threshold {
                evicted.push((id.clone(), EvictionReason::Expired));
            } else {
                live.push((updated_at, id.clone()));
            }
        }

        if live.len() > self.config.capacity {
            live.sort();
            let excess = live.len() - self.config.capacity;
            evicted.extend(
                live.drain(..excess)
                    .map(|(_, id)| (id, EvictionReason::Capacity)),
            );
        }

        for (id, _) in &evicted {
            sessions.remove(id);
        }
        Ok(evicted)
    }

    fn report_evictions(&self, evicted: &[(SessionId, EvictionReason)]) {
        for (id, reason) in evicted {
            tracing::debug!(session_id = %id, reason = %reason, "evicted session");
            self.hooks.on_session_evicted(id, *reason);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
