use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCartRepository, DbChatSessionRepository, DbOrderRepository, DbProductRepository,
    DbUserRepository,
};
use crate::infra::gemini::GeminiChatModel;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub chat_model: GeminiChatModel,
    /// Most recent persisted turns fed to the model.
    pub chat_context_turns: u64,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbCartRepository {
        DbCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn chat_session_repo(&self) -> DbChatSessionRepository {
        DbChatSessionRepository {
            db: self.db.clone(),
        }
    }
}
