//! Common imports for most parley applications.

pub use crate::{
    ParleyConfig, ServiceError, SessionMessage, SessionTurn, TextService, build_service,
    build_service_from_env, build_service_with_transport,
};
pub use crate::{
    assistant_message, parse_provider_id, session, system_message, tool_message, tool_output,
    user_message,
};
pub use crate::{parley_messages, parley_msg, parley_session};
pub use crate::{
    CreateSession, GenerationOptions, GenerationRequest, GenerationResult, Message,
    ProviderAvailability, ProviderError, ProviderErrorKind, ProviderId, Role, SessionError,
    SessionErrorKind, SessionId, SessionSnapshot, ToolCall, ToolDefinition, ToolOutput,
};
