use crate::api::AppState;
use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, Request, header, request::Parts},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Identity of the caller, extracted from the `Authorization` bearer token.
///
/// Any missing, malformed, expired, or wrongly-signed token rejects the
/// request with the uniform auth error.
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION).ok_or(AppError::Auth)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Auth)?;
        let token = auth_str.strip_prefix("Bearer ").ok_or(AppError::Auth)?;

        let user_id = state.auth_service.verify_token(token)?;

        tracing::Span::current().record("user_id", tracing::field::display(user_id));

        Ok(Self { user_id })
    }
}

/// Request-id source for `SetRequestIdLayer`: reuses an incoming
/// `x-request-id` header and otherwise mints a fresh UUID.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(incoming) = request.headers().get("x-request-id") {
            return Some(RequestId::new(incoming.clone()));
        }

        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
