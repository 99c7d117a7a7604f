use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use felino_auth_types::bearer::parse_bearer;
use felino_auth_types::token::{issue_token, validate_token};
use felino_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{AuthenticatedUser, User};
use crate::error::StoreServiceError;

/// bcrypt work factor for stored password hashes.
pub const BCRYPT_COST: u32 = 10;

/// Result of a successful register or login.
#[derive(Debug)]
pub struct AuthOutput {
    pub user: AuthenticatedUser,
    pub token: String,
}

fn credentials(username: &str, password: &str) -> Result<String, StoreServiceError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(StoreServiceError::invalid(
            "username and password are required",
        ));
    }
    Ok(username.to_owned())
}

fn sign(user: &User, secret: &str) -> Result<AuthOutput, StoreServiceError> {
    let (token, _exp) = issue_token(user.id, secret).context("sign token")?;
    Ok(AuthOutput {
        user: AuthenticatedUser::from(user),
        token,
    })
}

async fn hash_password(password: String) -> Result<String, StoreServiceError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .context("join password hashing task")?
        .context("hash password")?;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, StoreServiceError> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("join password verification task")?
        .context("verify password")?;
    Ok(ok)
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: Option<UserRole>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, StoreServiceError> {
        let username = credentials(&input.username, &input.password)?;
        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(StoreServiceError::UsernameTaken);
        }
        let user = User {
            id: Uuid::now_v7(),
            username,
            password_hash: hash_password(input.password).await?,
            role: input.role.unwrap_or_default(),
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        sign(&user, &self.jwt_secret)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, StoreServiceError> {
        let username = credentials(&input.username, &input.password)?;
        let user = self
            .repo
            .find_by_username(&username)
            .await?
            .ok_or(StoreServiceError::InvalidCredentials)?;
        if !verify_password(input.password, user.password_hash.clone()).await? {
            return Err(StoreServiceError::InvalidCredentials);
        }
        sign(&user, &self.jwt_secret)
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve the `Authorization` header to a live user.
pub struct AuthenticateUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    pub async fn execute(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, StoreServiceError> {
        let header = authorization.ok_or(StoreServiceError::MissingToken)?;
        let token = parse_bearer(header).ok_or(StoreServiceError::InvalidToken)?;
        let user_id = validate_token(token, &self.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            StoreServiceError::InvalidToken
        })?;
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(StoreServiceError::UnknownTokenSubject)?;
        Ok(AuthenticatedUser::from(&user))
    }
}
