use uuid::Uuid;

use crate::error::StoreServiceError;

pub mod ai_chat;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod orders;
pub mod products;
pub mod root;

/// Parse a path segment as an id; malformed ids are client errors, not 404s.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, StoreServiceError> {
    raw.parse::<Uuid>()
        .map_err(|_| StoreServiceError::InvalidInput(format!("invalid {what} id")))
}
