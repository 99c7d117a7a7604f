use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use felino_domain::user::UserRole;

use crate::domain::types::{AuthenticatedUser, Order, OrderLine, OrderView};
use crate::error::StoreServiceError;
use crate::handlers::parse_id;
use crate::handlers::products::ProductResponse;
use crate::policy::CurrentUser;
use crate::state::AppState;
use crate::usecase::order::{
    ListAllOrdersUseCase, ListUserOrdersUseCase, PlaceOrderInput, PlaceOrderUseCase,
};

#[derive(Debug, Serialize)]
pub struct OrderUserResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl From<AuthenticatedUser> for OrderUserResponse {
    fn from(u: AuthenticatedUser) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Option<String>,
    /// Only present in listings; `null` once the product is deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Option<ProductResponse>>,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OrderUserResponse>,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: f64,
    #[serde(serialize_with = "felino_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            user: None,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product_id: i.product_id.map(|id| id.to_string()),
                    product: None,
                    quantity: i.quantity,
                })
                .collect(),
            total_amount: order.total_amount,
            created_at: order.created_at,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let mut out = OrderResponse::from(view.order);
        for (item, product) in out.items.iter_mut().zip(view.products) {
            item.product = Some(product.map(Into::into));
        }
        out.user = view.user.map(Into::into);
        out
    }
}

// ── POST /api/orders ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub total_amount: f64,
}

#[derive(Serialize)]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    pub order: OrderResponse,
}

pub async fn place_order(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), StoreServiceError> {
    // A malformed userId can never match the requester.
    let user_id = body
        .user_id
        .parse()
        .map_err(|_| StoreServiceError::Forbidden)?;
    let items = body
        .items
        .iter()
        .map(|i| {
            Ok(OrderLine {
                product_id: parse_id(&i.product_id, "product")?,
                quantity: i.quantity,
            })
        })
        .collect::<Result<Vec<_>, StoreServiceError>>()?;

    let usecase = PlaceOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(
            user.id,
            PlaceOrderInput {
                user_id,
                items,
                total_amount: body.total_amount,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "order created",
            order: order.into(),
        }),
    ))
}

// ── GET /api/orders/my-orders ────────────────────────────────────────────────

pub async fn my_orders(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    let usecase = ListUserOrdersUseCase {
        orders: state.order_repo(),
        products: state.product_repo(),
    };
    let views = usecase.execute(user.id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

// ── GET /api/orders ──────────────────────────────────────────────────────────

pub async fn all_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    let usecase = ListAllOrdersUseCase {
        orders: state.order_repo(),
        products: state.product_repo(),
        users: state.user_repo(),
    };
    let views = usecase.execute().await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}
