use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the request-id layer. Apply with `.layer(request_id_layer())` in router.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(
        axum::http::HeaderName::from_static("x-request-id"),
        MakeUuidRequestId,
    )
}

/// CORS for a single browser frontend origin with credentials.
///
/// An origin that is not a valid header value disables cross-origin access instead of
/// failing startup.
pub fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(frontend_origin.trim_end_matches('/')) {
        Ok(v) => AllowOrigin::exact(v),
        Err(_) => {
            tracing::warn!(origin = frontend_origin, "invalid frontend origin; CORS disabled");
            AllowOrigin::list(std::iter::empty())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
