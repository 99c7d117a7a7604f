use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use felino_core::config::Config;
use felino_store::config::StoreConfig;
use felino_store::infra::gemini::GeminiChatModel;
use felino_store::router::build_router;
use felino_store::state::AppState;
use felino_store_migration::Migrator;

#[tokio::main]
async fn main() {
    felino_core::tracing::init_tracing("info,sqlx=warn,sea_orm=warn");

    let config = StoreConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("failed to apply migrations");

    let chat_model = GeminiChatModel {
        client: reqwest::Client::new(),
        base_url: config.gemini_base_url.clone(),
        model: config.gemini_model.clone(),
        api_key: config.gemini_api_key.clone(),
    };

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret.clone(),
        chat_model,
        chat_context_turns: config.chat_context_turns,
    };

    let router = build_router(state, &config.frontend_url);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!(model = %config.gemini_model, "store service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
