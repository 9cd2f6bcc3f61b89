use pcommon::{BoxFuture, GenerationOptions};

use crate::{GenerationResult, Message, ProviderError, ProviderId, ToolDefinition};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Validated input handed to an adapter.
///
/// `messages` is the caller's full list, `conversation` the same list with
/// system messages removed, and `system_prompt` their joined text. Options
/// only carry what the caller set; adapters apply their own defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderParams {
    pub model: String,
    pub messages: Vec<Message>,
    pub conversation: Vec<Message>,
    pub system_prompt: Option<String>,
    pub options: GenerationOptions,
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ProviderParams {
    /// Declared tools, or an empty slice when none or an empty list were given.
    pub fn tools(&self) -> &[ToolDefinition] {
        self.tools.as_deref().unwrap_or_default()
    }
}

pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn generate<'a>(
        &'a self,
        params: ProviderParams,
    ) -> ProviderFuture<'a, Result<GenerationResult, ProviderError>>;
}
