use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use felino_core::health::healthz;
use felino_core::middleware::{cors_layer, request_id_layer};

use crate::handlers::{
    ai_chat, auth,
    cart::{add_to_cart, get_cart, remove_from_cart, update_quantity},
    chat,
    orders::{all_orders, my_orders, place_order},
    products::{create_product, delete_product, get_product, list_products, update_product},
    root::{index, readyz},
};
use crate::policy::gate;
use crate::state::AppState;

/// Routes without CORS or tracing layers. The policy gate is attached here.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        // Root and health
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Catalog
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // Cart
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/update-quantity/{product_id}", put(update_quantity))
        .route("/api/cart/remove/{product_id}", delete(remove_from_cart))
        // Orders
        .route("/api/orders", post(place_order).get(all_orders))
        .route("/api/orders/my-orders", get(my_orders))
        // Chat
        .route("/api/ai-chat/message", post(ai_chat::send_message))
        .route("/api/ai-chat/session", get(ai_chat::get_session))
        .route("/api/chat/message", post(chat::send_message))
        .route("/api/chat/history", get(chat::history))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state)
}

pub fn build_router(state: AppState, frontend_origin: &str) -> Router {
    build_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(cors_layer(frontend_origin))
}
