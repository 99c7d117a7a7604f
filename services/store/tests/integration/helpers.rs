use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use felino_domain::chat::ChatRole;
use felino_domain::user::UserRole;
use felino_store::domain::repository::{
    CartRepository, ChatModel, ChatSessionRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use felino_store::domain::types::{
    CartLine, ChatSession, ChatTurn, ModelReply, NewOrder, Order, OrderItem, Product, PromptTurn,
    ToolCall, ToolDeclaration, User,
};
use felino_store::error::StoreServiceError;

pub use felino_testing::auth::TEST_JWT_SECRET;

// ── MemoryStore ──────────────────────────────────────────────────────────────

/// In-memory tables shared by every mock repository handed out by one store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub users: Arc<Mutex<Vec<User>>>,
    pub products: Arc<Mutex<Vec<Product>>>,
    /// `(user_id, product_id, quantity)` in insertion order.
    pub cart: Arc<Mutex<Vec<(Uuid, Uuid, i32)>>>,
    pub orders: Arc<Mutex<Vec<Order>>>,
    pub sessions: Arc<Mutex<Vec<ChatSession>>>,
    /// `(user_id, turn)` in append order.
    pub turns: Arc<Mutex<Vec<(Uuid, ChatTurn)>>>,
}

impl MemoryStore {
    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::default();
        *store.users.lock().unwrap() = users;
        store
    }

    pub fn add_product(&self, product: Product) {
        self.products.lock().unwrap().push(product);
    }

    pub fn stock_of(&self, id: Uuid) -> i32 {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.stock)
            .unwrap()
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo { store: self.clone() }
    }

    pub fn product_repo(&self) -> MockProductRepo {
        MockProductRepo { store: self.clone() }
    }

    pub fn cart_repo(&self) -> MockCartRepo {
        MockCartRepo { store: self.clone() }
    }

    pub fn order_repo(&self) -> MockOrderRepo {
        MockOrderRepo { store: self.clone() }
    }

    pub fn chat_repo(&self) -> MockChatSessionRepo {
        MockChatSessionRepo { store: self.clone() }
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    store: MemoryStore,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        Ok(self.store.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreServiceError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreServiceError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        let mut users = self.store.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreServiceError::UsernameTaken);
        }
        users.push(user.clone());
        Ok(())
    }
}

// ── MockProductRepo ──────────────────────────────────────────────────────────

pub struct MockProductRepo {
    store: MemoryStore,
}

impl ProductRepository for MockProductRepo {
    async fn list(&self) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self.store.products.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        Ok(self
            .store
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self
            .store
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreServiceError> {
        Ok(self
            .store
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        let mut products = self.store.products.lock().unwrap();
        if products.iter().any(|p| p.name == product.name) {
            return Err(StoreServiceError::ProductNameTaken);
        }
        products.push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StoreServiceError> {
        let mut products = self.store.products.lock().unwrap();
        if products
            .iter()
            .any(|p| p.name == product.name && p.id != product.id)
        {
            return Err(StoreServiceError::ProductNameTaken);
        }
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreServiceError::ProductNotFound)?;
        *slot = product.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let mut products = self.store.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        let deleted = products.len() != before;
        if deleted {
            // Mirrors the cascade on cart_items and the SET NULL on order_items.
            self.store.cart.lock().unwrap().retain(|(_, pid, _)| *pid != id);
            for order in self.store.orders.lock().unwrap().iter_mut() {
                for item in order.items.iter_mut() {
                    if item.product_id == Some(id) {
                        item.product_id = None;
                    }
                }
            }
        }
        Ok(deleted)
    }
}

// ── MockCartRepo ─────────────────────────────────────────────────────────────

pub struct MockCartRepo {
    store: MemoryStore,
}

impl CartRepository for MockCartRepo {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        let products = self.store.products.lock().unwrap();
        Ok(self
            .store
            .cart
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _, _)| *uid == user_id)
            .filter_map(|(_, pid, qty)| {
                products.iter().find(|p| p.id == *pid).map(|p| CartLine {
                    product: p.clone(),
                    quantity: *qty,
                })
            })
            .collect())
    }

    async fn find_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<i32>, StoreServiceError> {
        Ok(self
            .store
            .cart
            .lock()
            .unwrap()
            .iter()
            .find(|(uid, pid, _)| *uid == user_id && *pid == product_id)
            .map(|(_, _, qty)| *qty))
    }

    async fn add_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError> {
        let mut cart = self.store.cart.lock().unwrap();
        match cart
            .iter_mut()
            .find(|(uid, pid, _)| *uid == user_id && *pid == product_id)
        {
            Some(line) => line.2 += quantity,
            None => cart.push((user_id, product_id, quantity)),
        }
        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError> {
        let mut cart = self.store.cart.lock().unwrap();
        if let Some(line) = cart
            .iter_mut()
            .find(|(uid, pid, _)| *uid == user_id && *pid == product_id)
        {
            line.2 = quantity;
        }
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreServiceError> {
        let mut cart = self.store.cart.lock().unwrap();
        let before = cart.len();
        cart.retain(|(uid, pid, _)| !(*uid == user_id && *pid == product_id));
        Ok(cart.len() != before)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

pub struct MockOrderRepo {
    store: MemoryStore,
}

impl OrderRepository for MockOrderRepo {
    /// Reserves against a working copy of the catalog and commits it only when every line
    /// succeeds.
    async fn place(&self, order: &NewOrder) -> Result<Order, StoreServiceError> {
        let mut products = self.store.products.lock().unwrap();
        let mut working = products.clone();
        for line in &order.items {
            working
                .iter_mut()
                .find(|p| p.id == line.product_id)
                .ok_or(StoreServiceError::ProductNotFound)?
                .reserve(line.quantity)?;
        }
        *products = working;

        let placed = Order {
            id: Uuid::now_v7(),
            user_id: order.user_id,
            items: order
                .items
                .iter()
                .map(|l| OrderItem {
                    product_id: Some(l.product_id),
                    quantity: l.quantity,
                })
                .collect(),
            total_amount: order.total_amount,
            created_at: Utc::now(),
        };
        self.store.orders.lock().unwrap().push(placed.clone());
        Ok(placed)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        Ok(self
            .store
            .orders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreServiceError> {
        Ok(self.store.orders.lock().unwrap().iter().rev().cloned().collect())
    }
}

// ── MockChatSessionRepo ──────────────────────────────────────────────────────

pub struct MockChatSessionRepo {
    store: MemoryStore,
}

impl ChatSessionRepository for MockChatSessionRepo {
    async fn find_or_create(&self, user_id: Uuid) -> Result<ChatSession, StoreServiceError> {
        let mut sessions = self.store.sessions.lock().unwrap();
        if let Some(s) = sessions.iter().find(|s| s.user_id == user_id) {
            return Ok(s.clone());
        }
        let now = Utc::now();
        let session = ChatSession {
            user_id,
            created_at: now,
            updated_at: now,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn turns(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ChatTurn>, StoreServiceError> {
        let all: Vec<ChatTurn> = self
            .store
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, t)| t.clone())
            .collect();
        let skip = match limit {
            Some(n) => all.len().saturating_sub(n as usize),
            None => 0,
        };
        Ok(all.into_iter().skip(skip).collect())
    }

    async fn append_exchange(
        &self,
        user_id: Uuid,
        user_text: &str,
        reply: &str,
    ) -> Result<(), StoreServiceError> {
        let now = Utc::now();
        let mut turns = self.store.turns.lock().unwrap();
        turns.push((
            user_id,
            ChatTurn {
                role: ChatRole::User,
                content: user_text.to_owned(),
                created_at: now,
            },
        ));
        turns.push((
            user_id,
            ChatTurn {
                role: ChatRole::Assistant,
                content: reply.to_owned(),
                created_at: now,
            },
        ));
        if let Some(s) = self
            .store
            .sessions
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.user_id == user_id)
        {
            s.updated_at = now;
        }
        Ok(())
    }
}

// ── MockChatModel ────────────────────────────────────────────────────────────

/// Replays scripted first replies and records everything it was sent.
#[derive(Default)]
pub struct MockChatModel {
    pub replies: Mutex<VecDeque<Result<ModelReply, StoreServiceError>>>,
    /// Text returned after a tool result.
    pub follow_up: String,
    pub histories: Arc<Mutex<Vec<Vec<PromptTurn>>>>,
    pub tool_results: Arc<Mutex<Vec<(ToolCall, String)>>>,
}

impl MockChatModel {
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(ModelReply {
            text: Some(text.to_owned()),
            tool_call: None,
        })])
    }

    pub fn calling_tool(name: &str, args: serde_json::Value, follow_up: &str) -> Self {
        let mut model = Self::scripted(vec![Ok(ModelReply {
            text: None,
            tool_call: Some(ToolCall {
                name: name.to_owned(),
                args,
            }),
        })]);
        model.follow_up = follow_up.to_owned();
        model
    }

    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Err(StoreServiceError::AiProvider(message.to_owned()))])
    }

    pub fn scripted(replies: Vec<Result<ModelReply, StoreServiceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }
}

impl ChatModel for MockChatModel {
    async fn invoke(
        &self,
        history: &[PromptTurn],
        _tools: &[ToolDeclaration],
    ) -> Result<ModelReply, StoreServiceError> {
        self.histories.lock().unwrap().push(history.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelReply::default()))
    }

    async fn continue_with_tool_result(
        &self,
        _history: &[PromptTurn],
        _tools: &[ToolDeclaration],
        call: &ToolCall,
        result: &str,
    ) -> Result<String, StoreServiceError> {
        self.tool_results
            .lock()
            .unwrap()
            .push((call.clone(), result.to_owned()));
        Ok(self.follow_up.clone())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(username: &str, role: UserRole) -> User {
    User {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        password_hash: "not-a-real-hash".to_owned(),
        role,
        created_at: Utc::now(),
    }
}

pub fn test_product(name: &str, price: f64, stock: i32) -> Product {
    let now = Utc::now() - Duration::minutes(1);
    Product {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        description: format!("{name} para gatos"),
        price,
        stock,
        image_url: format!("https://img.example.com/{}.png", name.to_lowercase()),
        category: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn assert_error(result: Result<impl std::fmt::Debug, StoreServiceError>, kind: &str) {
    match result {
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {e:?}"),
        Ok(v) => panic!("expected {kind}, got Ok({v:?})"),
    }
}
