use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Product, ProductPatch};
use crate::error::StoreServiceError;
use crate::handlers::parse_id;
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, UpdateProductUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image_url: String,
    pub category: Option<String>,
    #[serde(serialize_with = "felino_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "felino_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            image_url: p.image_url,
            category: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /api/products ────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, StoreServiceError> {
    let usecase = ListProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /api/products/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, StoreServiceError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase.execute(parse_id(&id, "product")?).await?;
    Ok(Json(product.into()))
}

// ── POST /api/products ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), StoreServiceError> {
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
            image_url: body.image_url,
            category: body.category,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PUT /api/products/{id} ───────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, StoreServiceError> {
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(
            parse_id(&id, "product")?,
            ProductPatch {
                name: body.name,
                description: body.description,
                price: body.price,
                stock: body.stock,
                image_url: body.image_url,
                category: body.category,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, StoreServiceError> {
    let usecase = DeleteProductUseCase {
        products: state.product_repo(),
    };
    usecase.execute(parse_id(&id, "product")?).await?;
    Ok(Json(MessageResponse {
        message: "product deleted",
    }))
}
