use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::domain::types::{
    AuthenticatedUser, NewOrder, Order, OrderLine, OrderView, Product,
};
use crate::error::StoreServiceError;

async fn resolve_products<P: ProductRepository>(
    products: &P,
    orders: &[Order],
) -> Result<HashMap<Uuid, Product>, StoreServiceError> {
    let mut ids: Vec<Uuid> = orders
        .iter()
        .flat_map(|o| o.items.iter().filter_map(|i| i.product_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(products
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

fn view(
    order: Order,
    products: &HashMap<Uuid, Product>,
    user: Option<AuthenticatedUser>,
) -> OrderView {
    let resolved = order
        .items
        .iter()
        .map(|i| i.product_id.and_then(|id| products.get(&id).cloned()))
        .collect();
    OrderView {
        order,
        products: resolved,
        user,
    }
}

// ── PlaceOrder ───────────────────────────────────────────────────────────────

pub struct PlaceOrderInput {
    pub user_id: Uuid,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
}

pub struct PlaceOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> PlaceOrderUseCase<O> {
    pub async fn execute(
        &self,
        requester: Uuid,
        input: PlaceOrderInput,
    ) -> Result<Order, StoreServiceError> {
        if requester != input.user_id {
            return Err(StoreServiceError::Forbidden);
        }
        if input.items.is_empty() {
            return Err(StoreServiceError::invalid("order must contain at least one item"));
        }
        if input.items.iter().any(|i| i.quantity < 1) {
            return Err(StoreServiceError::invalid("item quantity must be at least 1"));
        }
        if !input.total_amount.is_finite() || input.total_amount < 0.0 {
            return Err(StoreServiceError::invalid(
                "totalAmount must be zero or positive",
            ));
        }

        let order = self
            .orders
            .place(&NewOrder {
                user_id: input.user_id,
                items: input.items,
                total_amount: input.total_amount,
            })
            .await?;
        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.items.len(),
            "order placed"
        );
        Ok(order)
    }
}

// ── ListUserOrders ───────────────────────────────────────────────────────────

pub struct ListUserOrdersUseCase<O: OrderRepository, P: ProductRepository> {
    pub orders: O,
    pub products: P,
}

impl<O: OrderRepository, P: ProductRepository> ListUserOrdersUseCase<O, P> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<OrderView>, StoreServiceError> {
        let orders = self.orders.list_by_user(user_id).await?;
        let products = resolve_products(&self.products, &orders).await?;
        Ok(orders
            .into_iter()
            .map(|o| view(o, &products, None))
            .collect())
    }
}

// ── ListAllOrders ────────────────────────────────────────────────────────────

pub struct ListAllOrdersUseCase<O: OrderRepository, P: ProductRepository, U: UserRepository> {
    pub orders: O,
    pub products: P,
    pub users: U,
}

impl<O: OrderRepository, P: ProductRepository, U: UserRepository> ListAllOrdersUseCase<O, P, U> {
    pub async fn execute(&self) -> Result<Vec<OrderView>, StoreServiceError> {
        let orders = self.orders.list_all().await?;
        let products = resolve_products(&self.products, &orders).await?;

        let mut user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let users: HashMap<Uuid, AuthenticatedUser> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&user_ids)
                .await?
                .iter()
                .map(|u| (u.id, AuthenticatedUser::from(u)))
                .collect()
        };

        Ok(orders
            .into_iter()
            .map(|o| {
                let user = users.get(&o.user_id).cloned();
                view(o, &products, user)
            })
            .collect())
    }
}
