use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use felino_domain::user::UserRole;

use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::auth::{AuthOutput, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub token: String,
}

impl From<AuthOutput> for AuthResponse {
    fn from(out: AuthOutput) -> Self {
        Self {
            id: out.user.id.to_string(),
            username: out.user.username,
            role: out.user.role,
            token: out.token,
        }
    }
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<UserRole>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), StoreServiceError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(RegisterInput {
            username: body.username,
            password: body.password,
            role: body.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(out.into())))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, StoreServiceError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(Json(out.into()))
}
