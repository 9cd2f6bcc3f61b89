//! `TextService`: one dispatcher plus one session store, and the turn
//! workflows that tie them together.

use pcommon::{GenerationOptions, SessionId};
use pprovider::{
    GenerationDispatcher, GenerationRequest, GenerationResult, Message, ProviderAvailability,
};
use psession::{
    CreateSession, SessionError, SessionHandle, SessionSnapshot, SessionStore, ToolOutput,
    validate_defaults,
};
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// A user turn submitted to an existing session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
    #[serde(flatten)]
    pub overrides: GenerationOptions,
}

impl SessionMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn with_overrides(mut self, overrides: GenerationOptions) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Outcome of one generation run against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTurn {
    pub result: GenerationResult,
    pub session: SessionSnapshot,
}

pub struct TextService {
    dispatcher: GenerationDispatcher,
    sessions: SessionStore,
}

impl TextService {
    pub fn new(dispatcher: GenerationDispatcher, sessions: SessionStore) -> Self {
        Self {
            dispatcher,
            sessions,
        }
    }

    pub fn dispatcher(&self) -> &GenerationDispatcher {
        &self.dispatcher
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn generate_text(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, ServiceError> {
        Ok(self.dispatcher.generate(request).await?)
    }

    pub fn describe_providers(&self) -> Vec<ProviderAvailability> {
        self.dispatcher.describe_providers()
    }

    pub fn create_session(&self, request: CreateSession) -> Result<SessionSnapshot, ServiceError> {
        let snapshot = self.sessions.create(request)?;
        tracing::debug!(session_id = %snapshot.id, provider = %snapshot.provider, "created session");
        Ok(snapshot)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<SessionSnapshot, ServiceError> {
        Ok(self.sessions.get(id)?.snapshot()?)
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<bool, ServiceError> {
        Ok(self.sessions.delete(id)?)
    }

    pub fn append_session_messages(
        &self,
        id: &SessionId,
        messages: &[Message],
    ) -> Result<(), ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.append_messages(&handle, messages)?)
    }

    pub fn queue_session_instructions(
        &self,
        id: &SessionId,
        instructions: Vec<String>,
    ) -> Result<(), ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.queue_instructions(&handle, instructions)?)
    }

    pub fn queue_session_tool_outputs(
        &self,
        id: &SessionId,
        outputs: Vec<ToolOutput>,
    ) -> Result<(), ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.queue_tool_outputs(&handle, outputs)?)
    }

    pub fn clear_session_queues(&self, id: &SessionId) -> Result<(), ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.clear_queues(&handle)?)
    }

    pub fn update_session_defaults(
        &self,
        id: &SessionId,
        partial: GenerationOptions,
    ) -> Result<(), ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.update_defaults(&handle, partial)?)
    }

    pub fn serialize_session(&self, id: &SessionId) -> Result<SessionSnapshot, ServiceError> {
        let handle = self.sessions.get(id)?;
        Ok(self.sessions.serialize(&handle)?)
    }

    pub fn list_active_sessions(&self) -> Result<Vec<SessionSnapshot>, ServiceError> {
        Ok(self.sessions.list_active()?)
    }

    /// Appends any instructions as system messages and the user message, then
    /// generates a reply and records it.
    ///
    /// Overrides apply to this turn and are merged into the session defaults
    /// once generation succeeds.
    pub async fn send_session_message(
        &self,
        id: &SessionId,
        message: SessionMessage,
    ) -> Result<SessionTurn, ServiceError> {
        let content = message.content.trim();
        if content.is_empty() {
            return Err(SessionError::validation("Message content must be a non-empty string").into());
        }
        validate_defaults(&message.overrides)?;

        let handle = self.sessions.get(id)?;
        let _turn = handle.lock_turn().await;

        let mut pending = instruction_messages(message.instructions);
        pending.push(Message::user(content));

        self.run_turn(&handle, pending, message.overrides).await
    }

    /// Appends instructions as system messages and runs one generation with
    /// the session defaults.
    pub async fn submit_session_instructions(
        &self,
        id: &SessionId,
        instructions: Vec<String>,
    ) -> Result<SessionTurn, ServiceError> {
        let handle = self.sessions.get(id)?;
        let _turn = handle.lock_turn().await;

        self.run_turn(
            &handle,
            instruction_messages(instructions),
            GenerationOptions::default(),
        )
        .await
    }

    /// Records tool results as `tool` messages without generating.
    pub async fn submit_session_tool_outputs(
        &self,
        id: &SessionId,
        outputs: Vec<ToolOutput>,
    ) -> Result<SessionSnapshot, ServiceError> {
        if outputs.is_empty() {
            return Err(SessionError::validation("toolOutputs array cannot be empty").into());
        }

        let messages = outputs
            .iter()
            .map(|output| {
                let call_id = output.call_id.trim();
                let content = output.output.trim();
                if call_id.is_empty() {
                    return Err(SessionError::validation("callId must be a non-empty string"));
                }
                if content.is_empty() {
                    return Err(SessionError::validation("output must be a non-empty string"));
                }
                Ok(Message::tool_result(call_id, content))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let handle = self.sessions.get(id)?;
        let _turn = handle.lock_turn().await;
        self.sessions.append_messages(&handle, &messages)?;

        Ok(handle.snapshot()?)
    }

    /// Drops every session. Returns how many were removed.
    pub fn shutdown(&self) -> Result<usize, ServiceError> {
        let removed = self.sessions.clear()?;
        tracing::info!(removed, "text service shut down");
        Ok(removed)
    }

    // Callers hold the session's turn lock.
    async fn run_turn(
        &self,
        handle: &SessionHandle,
        pending: Vec<Message>,
        overrides: GenerationOptions,
    ) -> Result<SessionTurn, ServiceError> {
        if !pending.is_empty() {
            self.sessions.append_messages(handle, &pending)?;
        }

        let snapshot = handle.snapshot()?;
        let mut request =
            GenerationRequest::new(snapshot.provider, snapshot.model, snapshot.messages)
                .with_options(snapshot.defaults.overridden_by(overrides));
        if let Some(tools) = snapshot.tools {
            request = request.with_tools(tools);
        }

        let result = self.dispatcher.generate(request).await?;

        if !result.text.is_empty() || result.has_tool_calls() {
            self.sessions
                .append_messages(handle, &[result.to_assistant_message()])?;
        }
        if !overrides.is_empty() {
            self.sessions.update_defaults(handle, overrides)?;
        }

        Ok(SessionTurn {
            result,
            session: handle.snapshot()?,
        })
    }
}

impl std::fmt::Debug for TextService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextService")
            .field("dispatcher", &self.dispatcher)
            .field("sessions", &self.sessions)
            .finish()
    }
}

fn instruction_messages(instructions: Vec<String>) -> Vec<Message> {
    instructions
        .iter()
        .map(|instruction| instruction.trim())
        .filter(|instruction| !instruction.is_empty())
        .map(Message::system)
        .collect()
}
