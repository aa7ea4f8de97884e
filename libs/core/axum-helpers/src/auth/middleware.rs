use super::error::AuthError;
use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

/// Name of the session cookie set on sign-in.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Token from `Authorization: Bearer <token>`, falling back to the
/// `access_token` cookie.
pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|cookies| cookies.split(';'))
                .find_map(|cookie| {
                    let (name, value) = cookie.trim().split_once('=')?;
                    (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
                })
        })
}

/// Rejects the request unless it carries a valid, unrevoked token.
///
/// On success the [`JwtClaims`](super::JwtClaims) are inserted into the request
/// extensions for [`AuthUser`](super::AuthUser) to pick up.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/me", get(me))
///     .route_layer(axum::middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_headers(&headers).ok_or(AuthError::MissingToken)?;
    let claims = auth.authenticate(&token).await?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Attaches claims when a valid token is present and lets every request through.
///
/// Routes that need a caller enforce it with the [`AuthUser`](super::AuthUser)
/// extractor, which answers 401 when no claims were attached.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_headers(&headers) {
        match auth.authenticate(&token).await {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(AuthError::Store(e)) => {
                tracing::error!("Token store error, treating caller as anonymous: {}", e);
            }
            Err(e) => {
                tracing::debug!("Ignoring unusable token: {}", e);
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=cookie-token"));
        assert_eq!(extract_token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=cookie-token; lang=en"),
        );
        assert_eq!(extract_token_from_headers(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(extract_token_from_headers(&headers), None);
    }
}
