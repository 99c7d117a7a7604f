//! The `searchProducts` tool offered to the chat model.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::types::{Product, ToolDeclaration};

pub const SEARCH_PRODUCTS: &str = "searchProducts";

pub fn search_products_tool() -> ToolDeclaration {
    ToolDeclaration {
        name: SEARCH_PRODUCTS,
        description: "Obtiene una lista de productos disponibles en la tienda. Puede filtrar \
                      por nombre, descripción o categoría si se especifica.",
        parameters: json!({
            "type": "OBJECT",
            "properties": {
                "query": {
                    "type": "STRING",
                    "description": "Palabra clave para buscar productos por nombre, descripción o categoría. Vacío devuelve todo el catálogo."
                }
            }
        }),
    }
}

/// Products whose name, description or category contains `query`, ignoring case.
/// A blank query matches everything.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Serialize)]
struct ProductSummary<'a> {
    id: Uuid,
    name: &'a str,
    price: f64,
    stock: i32,
    description: &'a str,
}

/// Tool output handed back to the model.
pub fn render_matches(query: &str, matches: &[&Product]) -> String {
    if matches.is_empty() {
        return format!("No products found for query: {query}");
    }
    let summaries: Vec<ProductSummary<'_>> = matches
        .iter()
        .map(|p| ProductSummary {
            id: p.id,
            name: &p.name,
            price: p.price,
            stock: p.stock,
            description: &p.description,
        })
        .collect();
    serde_json::to_string(&summaries)
        .unwrap_or_else(|e| format!("Error fetching products: {e}"))
}
