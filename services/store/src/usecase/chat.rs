//! Chat session engine.
//!
//! Each call rebuilds the working history from the persona preamble and the most recent
//! persisted turns, lets the model optionally call `searchProducts` once, and persists only
//! the user's message and the final reply.

use uuid::Uuid;

use crate::domain::prompt::{UNKNOWN_USER_NAME, build_prompt};
use crate::domain::repository::{
    ChatModel, ChatSessionRepository, ProductRepository, UserRepository,
};
use crate::domain::search::{SEARCH_PRODUCTS, filter_products, render_matches, search_products_tool};
use crate::domain::types::{ChatTurn, PromptTurn, ToolCall};
use crate::error::StoreServiceError;

// ── SendChatMessage ──────────────────────────────────────────────────────────

pub struct SendChatMessageUseCase<S, U, P, M>
where
    S: ChatSessionRepository,
    U: UserRepository,
    P: ProductRepository,
    M: ChatModel,
{
    pub sessions: S,
    pub users: U,
    pub products: P,
    pub model: M,
    /// Most recent persisted turns included in the working history.
    pub context_turns: u64,
}

impl<S, U, P, M> SendChatMessageUseCase<S, U, P, M>
where
    S: ChatSessionRepository,
    U: UserRepository,
    P: ProductRepository,
    M: ChatModel,
{
    pub async fn execute(&self, user_id: Uuid, text: &str) -> Result<String, StoreServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreServiceError::invalid("message is required"));
        }

        self.sessions.find_or_create(user_id).await?;
        let user_name = self
            .users
            .find_by_id(user_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_owned());
        let recent = self
            .sessions
            .turns(user_id, Some(self.context_turns))
            .await?;

        let mut history = build_prompt(&recent, &user_name);
        history.push(PromptTurn::user(text));
        let tools = [search_products_tool()];

        let reply = self.model.invoke(&history, &tools).await?;
        let final_text = match reply.tool_call {
            Some(call) => {
                let result = self.run_tool(&call).await;
                self.model
                    .continue_with_tool_result(&history, &tools, &call, &result)
                    .await?
            }
            None => reply.text.unwrap_or_default(),
        };

        self.sessions
            .append_exchange(user_id, text, &final_text)
            .await?;
        Ok(final_text)
    }

    /// Execute a tool locally. Failures become text for the model, never errors.
    async fn run_tool(&self, call: &ToolCall) -> String {
        tracing::info!(tool = %call.name, args = %call.args, "model invoked tool");
        if call.name != SEARCH_PRODUCTS {
            return format!("Unknown tool: {}", call.name);
        }
        let query = call
            .args
            .get("query")
            .and_then(|q| q.as_str())
            .unwrap_or_default();
        match self.products.list().await {
            Ok(products) => render_matches(query, &filter_products(&products, query)),
            Err(e) => {
                tracing::warn!(error = %e, "product search failed");
                format!("Error fetching products: {e}")
            }
        }
    }
}

// ── GetChatHistory ───────────────────────────────────────────────────────────

pub struct GetChatHistoryUseCase<S: ChatSessionRepository> {
    pub sessions: S,
}

impl<S: ChatSessionRepository> GetChatHistoryUseCase<S> {
    /// Persisted turns, oldest first; only the most recent `limit` when given. Creates the
    /// session on first access.
    pub async fn execute(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ChatTurn>, StoreServiceError> {
        self.sessions.find_or_create(user_id).await?;
        self.sessions.turns(user_id, limit).await
    }
}
