use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::jwt::JwtManager;
use crate::utils::error::ApiError;

/// Per-route state for [`require_scope`]: the verifier plus the scope the route needs.
#[derive(Clone)]
pub struct ScopeGuard {
    jwt: Arc<JwtManager>,
    scope: Arc<str>,
}

impl ScopeGuard {
    pub fn new(jwt: Arc<JwtManager>, scope: impl Into<Arc<str>>) -> Self {
        Self {
            jwt,
            scope: scope.into(),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("authorization header is expected".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("authorization header is not valid text".into()))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ApiError::Unauthorized(
            "authorization header must be 'Bearer <token>'".into(),
        )),
    }
}

/// Bearer token -> claims -> scope check. Verified claims are left in the
/// request extensions for handlers that want the caller's identity.
pub async fn require_scope(
    State(guard): State<ScopeGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = guard.jwt.validate_token(token).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::Unauthorized("invalid or expired token".into())
    })?;

    if !claims.has_scope(&guard.scope) {
        warn!(
            "User {} ({}) lacks scope {}",
            claims.user_id, claims.role, guard.scope
        );
        return Err(ApiError::Forbidden(format!(
            "permission '{}' not granted",
            guard.scope
        )));
    }

    debug!("User {} granted {}", claims.user_id, guard.scope);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
        assert!(bearer_token(&headers("Bearer a b")).is_err());
    }
}
