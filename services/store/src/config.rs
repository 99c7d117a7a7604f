use serde::Deserialize;

use felino_core::config::Config;

/// Store service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Generative model API key. Env var: `GEMINI_API_KEY`.
    pub gemini_api_key: String,
    /// Single browser origin allowed by CORS. Env var: `FRONTEND_URL`.
    pub frontend_url: String,
    /// TCP port to listen on (default 5000). Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Env var: `GEMINI_MODEL`.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Env var: `GEMINI_BASE_URL`.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    /// Most-recent persisted turns fed to the model. Env var: `CHAT_CONTEXT_TURNS`.
    #[serde(default = "default_chat_context_turns")]
    pub chat_context_turns: u64,
}

impl Config for StoreConfig {}

fn default_port() -> u16 {
    5000
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_owned()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_chat_context_turns() -> u64 {
    50
}
