//! Persona preamble for the shop assistant.
//!
//! The preamble is rebuilt on every call and never stored.

use crate::domain::types::{ChatTurn, PromptTurn};

/// Display name used when the session owner cannot be resolved.
pub const UNKNOWN_USER_NAME: &str = "Usuario Desconocido";

const MAX_NAME_CHARS: usize = 64;

/// Strip control characters and bound the length of a name before it enters a prompt.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNKNOWN_USER_NAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// Working history: the persona pair followed by `history` in order.
pub fn build_prompt(history: &[ChatTurn], user_name: &str) -> Vec<PromptTurn> {
    let name = sanitize_name(user_name);
    let mut prompt = Vec::with_capacity(history.len() + 2);
    prompt.push(PromptTurn::user(format!(
        "(Contexto para ti, tu nombre es Cat. El nombre del usuario con el que estás \
         conversando es {name}. Tenlo muy en cuenta en tus respuestas para personalizar la \
         conversación y no olvides sostener una actitud como un felino)"
    )));
    prompt.push(PromptTurn::assistant(format!(
        "(Entendido. Me referiré al usuario como {name} si es apropiado. ¿En qué puedo \
         ayudarte, {name}?)"
    )));
    prompt.extend(history.iter().map(|turn| PromptTurn {
        role: turn.role,
        text: turn.content.clone(),
    }));
    prompt
}
