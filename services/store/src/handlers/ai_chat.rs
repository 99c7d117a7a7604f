use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use felino_domain::chat::ChatRole;

use crate::domain::types::ChatTurn;
use crate::error::StoreServiceError;
use crate::policy::CurrentUser;
use crate::state::AppState;
use crate::usecase::chat::{GetChatHistoryUseCase, SendChatMessageUseCase};

// ── POST /api/ai-chat/message ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message_text: String,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
}

pub async fn send_message(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, StoreServiceError> {
    let usecase = SendChatMessageUseCase {
        sessions: state.chat_session_repo(),
        users: state.user_repo(),
        products: state.product_repo(),
        model: state.chat_model.clone(),
        context_turns: state.chat_context_turns,
    };
    let reply = usecase.execute(user.id, &body.message_text).await?;
    Ok(Json(SendMessageResponse { reply }))
}

// ── GET /api/ai-chat/session ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub role: ChatRole,
    pub text: String,
    #[serde(serialize_with = "felino_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<ChatTurn> for TurnResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            role: turn.role,
            text: turn.content,
            created_at: turn.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub history: Vec<TurnResponse>,
}

pub async fn get_session(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, StoreServiceError> {
    let usecase = GetChatHistoryUseCase {
        sessions: state.chat_session_repo(),
    };
    let turns = usecase.execute(user.id, None).await?;
    Ok(Json(SessionResponse {
        history: turns.into_iter().map(Into::into).collect(),
    }))
}
