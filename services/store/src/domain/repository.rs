#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    CartLine, ChatSession, ChatTurn, ModelReply, NewOrder, Order, Product, PromptTurn, ToolCall,
    ToolDeclaration, User,
};
use crate::error::StoreServiceError;

/// Repository for registered accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreServiceError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreServiceError>;
    /// Insert a new account. Fails with `UsernameTaken` on a username collision.
    async fn create(&self, user: &User) -> Result<(), StoreServiceError>;
}

/// Repository for the product catalog.
pub trait ProductRepository: Send + Sync {
    /// All products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, StoreServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreServiceError>;
    /// Fails with `ProductNameTaken` on a name collision.
    async fn create(&self, product: &Product) -> Result<(), StoreServiceError>;
    /// Overwrite every column of an existing product. Fails with `ProductNameTaken` on a name
    /// collision.
    async fn update(&self, product: &Product) -> Result<(), StoreServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError>;
}

/// Repository for per-user cart lines.
pub trait CartRepository: Send + Sync {
    /// Lines with products resolved, in insertion order.
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError>;
    async fn find_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<i32>, StoreServiceError>;
    /// Insert a line, or add `quantity` to the existing one in a single statement.
    async fn add_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError>;
    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError>;
    /// Returns `true` if a line was removed.
    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreServiceError>;
}

/// Repository for placed orders.
pub trait OrderRepository: Send + Sync {
    /// Reserve stock for every line in request order and record the order, all in one
    /// transaction. On any failure nothing is written and the first error is returned.
    async fn place(&self, order: &NewOrder) -> Result<Order, StoreServiceError>;
    /// Orders of one user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError>;
    /// Every order, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, StoreServiceError>;
}

/// Repository for chat sessions and their turns.
pub trait ChatSessionRepository: Send + Sync {
    /// Idempotent: concurrent first calls for the same user yield one session.
    async fn find_or_create(&self, user_id: Uuid) -> Result<ChatSession, StoreServiceError>;
    /// The most recent `limit` turns (all turns when `None`), oldest first.
    async fn turns(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ChatTurn>, StoreServiceError>;
    /// Append the user's message and the assistant's reply and bump `updated_at`, atomically.
    async fn append_exchange(
        &self,
        user_id: Uuid,
        user_text: &str,
        reply: &str,
    ) -> Result<(), StoreServiceError>;
}

/// Port to the external generative model.
pub trait ChatModel: Send + Sync {
    /// Send the working history (ending with the new user turn) with the callable tools.
    async fn invoke(
        &self,
        history: &[PromptTurn],
        tools: &[ToolDeclaration],
    ) -> Result<ModelReply, StoreServiceError>;

    /// Answer the model's tool call with `result` and return its final text.
    async fn continue_with_tool_result(
        &self,
        history: &[PromptTurn],
        tools: &[ToolDeclaration],
        call: &ToolCall,
        result: &str,
    ) -> Result<String, StoreServiceError>;
}
