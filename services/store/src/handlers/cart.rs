use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::CartLine;
use crate::error::StoreServiceError;
use crate::handlers::parse_id;
use crate::handlers::products::ProductResponse;
use crate::policy::CurrentUser;
use crate::state::AppState;
use crate::usecase::cart::{
    AddToCartUseCase, GetCartUseCase, RemoveFromCartUseCase, UpdateCartQuantityUseCase,
};

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub product: ProductResponse,
    pub quantity: i32,
}

fn cart_response(lines: Vec<CartLine>) -> Vec<CartLineResponse> {
    lines
        .into_iter()
        .map(|line| CartLineResponse {
            product: line.product.into(),
            quantity: line.quantity,
        })
        .collect()
}

// ── GET /api/cart ────────────────────────────────────────────────────────────

pub async fn get_cart(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLineResponse>>, StoreServiceError> {
    let usecase = GetCartUseCase {
        users: state.user_repo(),
        carts: state.cart_repo(),
    };
    Ok(Json(cart_response(usecase.execute(user.id).await?)))
}

// ── POST /api/cart/add ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i32,
}

pub async fn add_to_cart(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Vec<CartLineResponse>>, StoreServiceError> {
    let usecase = AddToCartUseCase {
        users: state.user_repo(),
        products: state.product_repo(),
        carts: state.cart_repo(),
    };
    let lines = usecase
        .execute(user.id, parse_id(&body.product_id, "product")?, body.quantity)
        .await?;
    Ok(Json(cart_response(lines)))
}

// ── PUT /api/cart/update-quantity/{product_id} ───────────────────────────────

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

pub async fn update_quantity(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<Vec<CartLineResponse>>, StoreServiceError> {
    let usecase = UpdateCartQuantityUseCase {
        users: state.user_repo(),
        products: state.product_repo(),
        carts: state.cart_repo(),
    };
    let lines = usecase
        .execute(user.id, parse_id(&product_id, "product")?, body.quantity)
        .await?;
    Ok(Json(cart_response(lines)))
}

// ── DELETE /api/cart/remove/{product_id} ─────────────────────────────────────

#[derive(Serialize)]
pub struct RemoveFromCartResponse {
    pub message: &'static str,
    pub cart: Vec<CartLineResponse>,
}

pub async fn remove_from_cart(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<RemoveFromCartResponse>, StoreServiceError> {
    let usecase = RemoveFromCartUseCase {
        users: state.user_repo(),
        carts: state.cart_repo(),
    };
    let lines = usecase
        .execute(user.id, parse_id(&product_id, "product")?)
        .await?;
    Ok(Json(RemoveFromCartResponse {
        message: "product removed from cart",
        cart: cart_response(lines),
    }))
}
