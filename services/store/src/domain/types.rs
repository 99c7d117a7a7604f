use chrono::{DateTime, Utc};
use uuid::Uuid;

use felino_domain::chat::ChatRole;
use felino_domain::user::UserRole;

use crate::error::StoreServiceError;

/// Account record including the bcrypt hash. Never serialized.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// The user resolved from a bearer token, without credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image_url: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Fail with `InsufficientStock` unless `quantity` units are available.
    pub fn ensure_available(&self, quantity: i32) -> Result<(), StoreServiceError> {
        if self.stock < quantity {
            return Err(StoreServiceError::InsufficientStock {
                product: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(())
    }

    /// Check availability and take `quantity` units out of stock.
    pub fn reserve(&mut self, quantity: i32) -> Result<(), StoreServiceError> {
        self.ensure_available(quantity)?;
        self.stock -= quantity;
        Ok(())
    }
}

/// Partial product update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
    }
}

/// A cart line with its product resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Order as submitted, after validation.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// `None` once the product has been deleted from the catalog.
    pub product_id: Option<Uuid>,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Order with referenced products (and, for the admin listing, the buyer) resolved.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: Order,
    pub products: Vec<Option<Product>>,
    pub user: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Turn sent to the model. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: ChatRole,
    pub text: String,
}

impl PromptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Function the model may call. `parameters` is an OpenAPI-style schema object.
#[derive(Debug, Clone)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: serde_json::Value,
}

/// First model response: text, a tool invocation, or both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelReply {
    pub text: Option<String>,
    pub tool_call: Option<ToolCall>,
}
