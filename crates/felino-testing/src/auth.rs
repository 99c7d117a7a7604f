//! Bearer-token helpers for router tests.
//!
//! Signs real tokens with a test secret so requests pass through the same JWT validation
//! path as production traffic.

use felino_auth_types::token::{issue_token, issue_token_with_exp};
use http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "felino-test-secret";

/// Identity a test request is signed for.
pub struct MockAuth {
    pub user_id: Uuid,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn with_secret(user_id: Uuid, secret: &str) -> Self {
        Self {
            user_id,
            secret: secret.to_owned(),
        }
    }

    /// A fresh signed token for this identity.
    pub fn token(&self) -> String {
        issue_token(self.user_id, &self.secret)
            .expect("sign test token")
            .0
    }

    /// A token that expired long ago.
    pub fn expired_token(&self) -> String {
        issue_token_with_exp(self.user_id, &self.secret, 1_000_000).expect("sign test token")
    }

    /// `Authorization: Bearer <token>` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("valid header value")
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, self.header_value());
        map
    }
}
