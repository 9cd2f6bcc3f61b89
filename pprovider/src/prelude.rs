//! Common `pprovider` imports for downstream crates.

pub use crate::{
    GenerationDispatcher, GenerationHooks, GenerationOptions, GenerationRequest, GenerationResult,
    Message, ProviderAvailability, ProviderError, ProviderErrorKind, ProviderId, Role, TokenUsage,
    ToolCall, ToolDefinition,
};
pub use pcommon::BoxFuture;
