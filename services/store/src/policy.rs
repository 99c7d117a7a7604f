//! Route authorization.
//!
//! Every route's access rule lives in [`POLICY`]; the [`gate`] middleware is the only place
//! that authenticates requests and checks roles.

use axum::extract::{FromRequestParts, MatchedPath, Request, State};
use axum::http::request::Parts;
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;

use felino_domain::user::UserRole;

use crate::domain::types::AuthenticatedUser;
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid token for an existing user.
    Authenticated,
    /// Valid token and one of the listed roles.
    Roles(&'static [UserRole]),
}

const ADMIN: Access = Access::Roles(&[UserRole::Admin]);
const USER: Access = Access::Roles(&[UserRole::User]);

/// `(method, route pattern, access)`. Routes not listed require authentication.
pub const POLICY: &[(&str, &str, Access)] = &[
    ("GET", "/", Access::Public),
    ("GET", "/healthz", Access::Public),
    ("GET", "/readyz", Access::Public),
    // Auth
    ("POST", "/api/auth/register", Access::Public),
    ("POST", "/api/auth/login", Access::Public),
    // Catalog
    ("GET", "/api/products", Access::Public),
    ("GET", "/api/products/{id}", Access::Public),
    ("POST", "/api/products", ADMIN),
    ("PUT", "/api/products/{id}", ADMIN),
    ("DELETE", "/api/products/{id}", ADMIN),
    // Cart
    ("GET", "/api/cart", USER),
    ("POST", "/api/cart/add", USER),
    ("PUT", "/api/cart/update-quantity/{product_id}", USER),
    ("DELETE", "/api/cart/remove/{product_id}", USER),
    // Orders
    ("POST", "/api/orders", Access::Authenticated),
    ("GET", "/api/orders/my-orders", Access::Authenticated),
    ("GET", "/api/orders", ADMIN),
    // Chat
    ("POST", "/api/ai-chat/message", USER),
    ("GET", "/api/ai-chat/session", USER),
    ("POST", "/api/chat/message", USER),
    ("GET", "/api/chat/history", USER),
];

pub fn access_for(method: &Method, route: &str) -> Access {
    POLICY
        .iter()
        .find(|(m, r, _)| *m == method.as_str() && *r == route)
        .map(|(_, _, access)| *access)
        .unwrap_or(Access::Authenticated)
}

/// Role check for an authenticated user. Only [`Access::Roles`] can reject.
pub fn authorize(access: Access, user: &AuthenticatedUser) -> Result<(), StoreServiceError> {
    match access {
        Access::Roles(roles) if !roles.contains(&user.role) => Err(StoreServiceError::Forbidden),
        _ => Ok(()),
    }
}

/// Authorization middleware. Apply with `route_layer` so the matched route is known.
pub async fn gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StoreServiceError> {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let access = access_for(req.method(), &route);
    if access == Access::Public {
        return Ok(next.run(req).await);
    }

    let authorization = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| StoreServiceError::InvalidToken)?),
        None => None,
    };
    let user = AuthenticateUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    }
    .execute(authorization)
    .await?;

    authorize(access, &user)?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// The user resolved by [`gate`].
///
/// Rejects with 401 when the gate did not run for the route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StoreServiceError;

    // Extract synchronously and return a 'static future (axum-core 0.5 signature).
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts.extensions.get::<CurrentUser>().cloned();
        async move { user.ok_or(StoreServiceError::MissingToken) }
    }
}
