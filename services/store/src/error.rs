use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Store service error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token subject no longer exists")]
    UnknownTokenSubject,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("cart item not found")]
    CartItemNotFound,
    #[error("username already taken")]
    UsernameTaken,
    #[error("product name already taken")]
    ProductNameTaken,
    #[error("insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },
    #[error("ai provider error: {0}")]
    AiProvider(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::UnknownTokenSubject => "UNKNOWN_TOKEN_SUBJECT",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::ProductNameTaken => "PRODUCT_NAME_TAKEN",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::AiProvider(_) => "AI_PROVIDER_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl IntoResponse for StoreServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) | Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::UnknownTokenSubject => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::ProductNotFound | Self::CartItemNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::UsernameTaken | Self::ProductNameTaken => StatusCode::CONFLICT,
            Self::AiProvider(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::AiProvider(msg) => {
                tracing::error!(error = %msg, kind = "AI_PROVIDER_ERROR", "ai provider error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
