/// Creates a single [`Message`](crate::Message) from a role shorthand.
///
/// Tool results name the call they answer: `tool(call_id) => output`.
///
/// ```rust
/// use parley::{Role, parley_msg};
///
/// let message = parley_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
///
/// let result = parley_msg!(tool("call_1") => "opened");
/// assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
/// ```
#[macro_export]
macro_rules! parley_msg {
    (system => $content:expr $(,)?) => {
        $crate::system_message($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::user_message($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::assistant_message($content)
    };
    (tool($call_id:expr) => $content:expr $(,)?) => {
        $crate::tool_message($call_id, $content)
    };
    (tool => $content:expr $(,)?) => {
        compile_error!("tool messages need a call id: tool(call_id) => output");
    };
    ($role:ident $(($call_id:expr))? => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, assistant, or tool(call_id)");
    };
}

/// Creates a `Vec<Message>` from role/content pairs, ready for
/// [`CreateSession::with_initial_messages`](crate::CreateSession::with_initial_messages).
///
/// ```rust
/// use parley::{Role, parley_messages};
///
/// let messages = parley_messages![
///     system => "You are concise.",
///     user => "Open the canvas.",
///     tool("call_7") => "canvas opened",
/// ];
///
/// assert_eq!(messages.len(), 3);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[2].role, Role::Tool);
/// ```
#[macro_export]
macro_rules! parley_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident $(($call_id:expr))? => $content:expr),+ $(,)?) => {
        vec![$($crate::parley_msg!($role $(($call_id))? => $content)),+]
    };
}

/// Creates a [`CreateSession`](crate::CreateSession) with provider shorthand support.
///
/// ```rust
/// use parley::{ProviderId, parley_session};
///
/// let session = parley_session!(gemini, "gemini-2.5-flash", "Be concise.");
/// assert_eq!(session.provider, ProviderId::Google);
/// assert_eq!(session.system_prompt.as_deref(), Some("Be concise."));
/// ```
#[macro_export]
macro_rules! parley_session {
    (@provider openai) => { $crate::ProviderId::OpenAi };
    (@provider anthropic) => { $crate::ProviderId::Anthropic };
    (@provider claude) => { $crate::ProviderId::Anthropic };
    (@provider google) => { $crate::ProviderId::Google };
    (@provider gemini) => { $crate::ProviderId::Google };
    (@provider ollama) => { $crate::ProviderId::Ollama };
    (@provider local) => { $crate::ProviderId::Ollama };
    (@provider $provider:expr) => { $provider };
    ($provider:tt, $model:expr $(,)?) => {
        $crate::CreateSession::new($crate::parley_session!(@provider $provider), $model)
    };
    ($provider:tt, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::CreateSession::new($crate::parley_session!(@provider $provider), $model)
            .with_system_prompt($system_prompt)
    };
}
