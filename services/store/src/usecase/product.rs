use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductPatch};
use crate::error::StoreServiceError;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn check_price(price: f64) -> Result<(), StoreServiceError> {
    if !price.is_finite() || price < 0.0 {
        return Err(StoreServiceError::invalid("price must be zero or positive"));
    }
    Ok(())
}

fn check_stock(stock: i32) -> Result<(), StoreServiceError> {
    if stock < 0 {
        return Err(StoreServiceError::invalid("stock must be zero or positive"));
    }
    Ok(())
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<Product>, StoreServiceError> {
        self.products.list().await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<Product, StoreServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)
    }
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

pub struct CreateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> CreateProductUseCase<P> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, StoreServiceError> {
        let (Some(name), Some(description), Some(price), Some(stock), Some(image_url)) = (
            non_blank(input.name),
            non_blank(input.description),
            input.price,
            input.stock,
            non_blank(input.image_url),
        ) else {
            return Err(StoreServiceError::invalid(
                "name, description, price, stock and imageUrl are required",
            ));
        };
        check_price(price)?;
        check_stock(stock)?;

        if self.products.find_by_name(&name).await?.is_some() {
            return Err(StoreServiceError::ProductNameTaken);
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name,
            description,
            price,
            stock,
            image_url,
            category: non_blank(input.category),
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await?;
        Ok(product)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> UpdateProductUseCase<P> {
    pub async fn execute(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreServiceError> {
        let patch = ProductPatch {
            name: non_blank(patch.name),
            description: non_blank(patch.description),
            image_url: non_blank(patch.image_url),
            category: non_blank(patch.category),
            ..patch
        };
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        if let Some(stock) = patch.stock {
            check_stock(stock)?;
        }

        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;

        if let Some(ref name) = patch.name {
            if let Some(existing) = self.products.find_by_name(name).await? {
                if existing.id != id {
                    return Err(StoreServiceError::ProductNameTaken);
                }
            }
        }

        patch.apply(&mut product);
        product.updated_at = Utc::now();
        self.products.update(&product).await?;
        Ok(product)
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> DeleteProductUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<(), StoreServiceError> {
        if !self.products.delete(id).await? {
            return Err(StoreServiceError::ProductNotFound);
        }
        Ok(())
    }
}
