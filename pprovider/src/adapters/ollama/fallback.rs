//! Tool-call recovery for models that answer with JSON text instead of
//! native tool calls.

use serde_json::Value;

use crate::{ToolCall, canonical_arguments};

/// Removes a surrounding ```` ``` ```` fence, including its language tag line.
///
/// Text without both an opening and a closing fence is returned trimmed.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let Some(newline) = trimmed.find('\n') else {
        return trimmed;
    };
    let body = &trimmed[newline + 1..];
    match body.rfind("```") {
        Some(closing) => body[..closing].trim(),
        None => trimmed,
    }
}

/// Parses `{"name": ..., "arguments": ...}` objects (single or array) out of
/// response text. Anything unparseable yields no calls.
pub fn extract_fallback_tool_calls(content: &str) -> Vec<ToolCall> {
    let candidate = strip_code_fence(content);
    if candidate.is_empty() {
        return Vec::new();
    }

    let parsed = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };

    let items = match parsed {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Vec::new(),
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let name = item.get("name")?.as_str()?;
            if name.is_empty() {
                return None;
            }
            let arguments = item.get("arguments").unwrap_or(&Value::Null);

            Some(ToolCall::new(
                format!("fallback_call_{index}"),
                name,
                canonical_arguments(arguments),
            ))
        })
        .collect()
}
