//! Cart engine.
//!
//! Stock is checked when lines are added or increased but never reserved; the order
//! transaction re-validates at checkout.

use uuid::Uuid;

use crate::domain::repository::{CartRepository, ProductRepository, UserRepository};
use crate::domain::types::{CartLine, Product};
use crate::error::StoreServiceError;

async fn ensure_user<U: UserRepository>(users: &U, user_id: Uuid) -> Result<(), StoreServiceError> {
    users
        .find_by_id(user_id)
        .await?
        .map(|_| ())
        .ok_or(StoreServiceError::UserNotFound)
}

async fn load_product<P: ProductRepository>(
    products: &P,
    product_id: Uuid,
) -> Result<Product, StoreServiceError> {
    products
        .find_by_id(product_id)
        .await?
        .ok_or(StoreServiceError::ProductNotFound)
}

// ── GetCart ──────────────────────────────────────────────────────────────────

pub struct GetCartUseCase<U: UserRepository, C: CartRepository> {
    pub users: U,
    pub carts: C,
}

impl<U: UserRepository, C: CartRepository> GetCartUseCase<U, C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        ensure_user(&self.users, user_id).await?;
        self.carts.list(user_id).await
    }
}

// ── AddToCart ────────────────────────────────────────────────────────────────

pub struct AddToCartUseCase<U: UserRepository, P: ProductRepository, C: CartRepository> {
    pub users: U,
    pub products: P,
    pub carts: C,
}

impl<U: UserRepository, P: ProductRepository, C: CartRepository> AddToCartUseCase<U, P, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Vec<CartLine>, StoreServiceError> {
        if quantity < 1 {
            return Err(StoreServiceError::invalid("quantity must be at least 1"));
        }
        ensure_user(&self.users, user_id).await?;
        let product = load_product(&self.products, product_id).await?;
        product.ensure_available(quantity)?;

        self.carts.add_quantity(user_id, product_id, quantity).await?;
        self.carts.list(user_id).await
    }
}

// ── UpdateCartQuantity ───────────────────────────────────────────────────────

pub struct UpdateCartQuantityUseCase<U: UserRepository, P: ProductRepository, C: CartRepository> {
    pub users: U,
    pub products: P,
    pub carts: C,
}

impl<U: UserRepository, P: ProductRepository, C: CartRepository>
    UpdateCartQuantityUseCase<U, P, C>
{
    /// Set a line's quantity. `0` removes the line.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Vec<CartLine>, StoreServiceError> {
        if quantity < 0 {
            return Err(StoreServiceError::invalid("quantity must not be negative"));
        }
        ensure_user(&self.users, user_id).await?;
        let product = load_product(&self.products, product_id).await?;
        let current = self
            .carts
            .find_quantity(user_id, product_id)
            .await?
            .ok_or(StoreServiceError::CartItemNotFound)?;

        if quantity == 0 {
            self.carts.remove(user_id, product_id).await?;
        } else {
            let increase = quantity - current;
            if increase > 0 {
                product.ensure_available(increase)?;
            }
            self.carts.set_quantity(user_id, product_id, quantity).await?;
        }
        self.carts.list(user_id).await
    }
}

// ── RemoveFromCart ───────────────────────────────────────────────────────────

pub struct RemoveFromCartUseCase<U: UserRepository, C: CartRepository> {
    pub users: U,
    pub carts: C,
}

impl<U: UserRepository, C: CartRepository> RemoveFromCartUseCase<U, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<CartLine>, StoreServiceError> {
        ensure_user(&self.users, user_id).await?;
        if !self.carts.remove(user_id, product_id).await? {
            return Err(StoreServiceError::CartItemNotFound);
        }
        self.carts.list(user_id).await
    }
}
