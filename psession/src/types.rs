//! Session snapshots, creation parameters, and store configuration.

use std::time::Duration;

use pcommon::{GenerationOptions, SessionId, Timestamp};
use pprovider::{Message, ProviderId, ToolDefinition};
use serde::{Deserialize, Serialize};

use crate::SessionError;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SESSION_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStoreConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}

impl SessionStoreConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Parameters for [`crate::SessionStore::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    pub provider: ProviderId,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, rename = "messages")]
    pub initial_messages: Vec<Message>,
    #[serde(flatten)]
    pub defaults: GenerationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl CreateSession {
    pub fn new(provider: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: None,
            initial_messages: Vec::new(),
            defaults: GenerationOptions::default(),
            tools: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_initial_messages(mut self, messages: Vec<Message>) -> Self {
        self.initial_messages = messages;
        self
    }

    pub fn with_defaults(mut self, defaults: GenerationOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// A tool result submitted by the caller, before it is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub call_id: String,
    pub output: String,
}

impl ToolOutput {
    pub fn new(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedToolOutput {
    pub call_id: String,
    pub output: String,
    pub added_at: Timestamp,
}

/// Deep copy of one session's state. Mutating a snapshot never affects the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub provider: ProviderId,
    pub model: String,
    pub messages: Vec<Message>,
    pub queued_instructions: Vec<String>,
    pub queued_tool_outputs: Vec<QueuedToolOutput>,
    pub defaults: GenerationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Range checks for generation defaults and per-turn overrides.
pub fn validate_defaults(options: &GenerationOptions) -> Result<(), SessionError> {
    if options.max_tokens == Some(0) {
        return Err(SessionError::validation("maxTokens must be greater than zero"));
    }

    if let Some(temperature) = options.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(SessionError::validation("temperature must be between 0 and 2"));
    }

    if let Some(top_p) = options.top_p
        && !(top_p > 0.0 && top_p <= 1.0)
    {
        return Err(SessionError::validation("topP must be between 0 and 1"));
    }

    Ok(())
}
