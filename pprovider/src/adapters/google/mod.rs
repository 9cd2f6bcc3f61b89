mod provider;
mod serde_api;
mod tests;

pub use provider::{GOOGLE_BASE_URL, GoogleAdapter, normalize_model_id};
pub use serde_api::{
    GeminiCandidate, GeminiContent, GeminiFunctionCall, GeminiFunctionCallingConfig,
    GeminiFunctionDeclaration, GeminiFunctionResponse, GeminiGenerateRequest,
    GeminiGenerateResponse, GeminiGenerationConfig, GeminiPart, GeminiSystemInstruction,
    GeminiTool, GeminiToolConfig, GeminiUsageMetadata,
};
