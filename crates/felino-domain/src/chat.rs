//! Chat conversation types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Author of a chat turn.
///
/// Storage format: `"user"` or `"assistant"`. Provider-specific labels (`"model"`, `"bot"`)
/// are rendered at the edges and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chat role: {0}")]
pub struct UnknownChatRole(pub String);

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = UnknownChatRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(UnknownChatRole(other.to_owned())),
        }
    }
}
