//! Legacy chat surface. Same engine and storage as `/api/ai-chat`, older wire shapes.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use felino_domain::chat::ChatRole;

use crate::domain::types::ChatTurn;
use crate::error::StoreServiceError;
use crate::policy::CurrentUser;
use crate::state::AppState;
use crate::usecase::chat::{GetChatHistoryUseCase, SendChatMessageUseCase};

pub const LEGACY_HISTORY_LIMIT: u64 = 50;

// ── POST /api/chat/message ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LegacyMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMessageResponse {
    pub bot_response: String,
}

pub async fn send_message(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<LegacyMessageRequest>,
) -> Result<Json<LegacyMessageResponse>, StoreServiceError> {
    let usecase = SendChatMessageUseCase {
        sessions: state.chat_session_repo(),
        users: state.user_repo(),
        products: state.product_repo(),
        model: state.chat_model.clone(),
        context_turns: state.chat_context_turns,
    };
    let bot_response = usecase.execute(user.id, &body.message).await?;
    Ok(Json(LegacyMessageResponse { bot_response }))
}

// ── GET /api/chat/history ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Serialize)]
pub struct LegacyTurnResponse {
    pub sender: Sender,
    pub message: String,
    #[serde(serialize_with = "felino_core::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
}

impl From<ChatTurn> for LegacyTurnResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            sender: match turn.role {
                ChatRole::User => Sender::User,
                ChatRole::Assistant => Sender::Bot,
            },
            message: turn.content,
            timestamp: turn.created_at,
        }
    }
}

pub async fn history(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LegacyTurnResponse>>, StoreServiceError> {
    let usecase = GetChatHistoryUseCase {
        sessions: state.chat_session_repo(),
    };
    let turns = usecase.execute(user.id, Some(LEGACY_HISTORY_LIMIT)).await?;
    Ok(Json(turns.into_iter().map(Into::into).collect()))
}
