use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

// ── GET / ────────────────────────────────────────────────────────────────────

pub async fn index() -> &'static str {
    "Mercado Felino API is running..."
}

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    felino_core::health::database_ready(&state.db).await
}
