use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::from_fn_with_state,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use axum_helpers::{
    ACCESS_TOKEN_COOKIE, AuditEvent, AuditOutcome, AuthError, AuthUser, ValidatedJson,
    auth::extract_token_from_headers,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{AccountError, AccountResult};
use crate::models::{AccountResponse, Role, SessionResponse, SignInRequest, SignUpRequest};
use crate::repository::AccountRepository;
use crate::service::AccountService;

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(sign_up, sign_in, sign_out, me),
    components(
        schemas(SignUpRequest, SignInRequest, SessionResponse, AccountResponse, Role),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Accounts and sessions")
    )
)]
pub struct ApiDoc;

/// Create the auth router.
///
/// `/me` is behind `jwt_auth_middleware`; sign-out reads the token itself so
/// that it still succeeds once the token is revoked or expired.
pub fn router<R: AccountRepository + 'static>(service: AccountService<R>) -> Router {
    let auth = service.auth().clone();
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .merge(protected)
        .with_state(shared_service)
}

fn session_cookie(value: &str, max_age: u64, secure: bool) -> AccountResult<HeaderValue> {
    let secure_flag = if secure { " Secure;" } else { "" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        ACCESS_TOKEN_COOKIE, value, secure_flag, max_age
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| AuthError::Issue(format!("Failed to create cookie: {}", e)).into())
}

/// Create an account and sign it in
#[utoipa::path(
    post,
    path = "/sign-up",
    tag = "Auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = SessionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_up<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> AccountResult<impl IntoResponse> {
    let email = input.email.clone();
    let session = match service.sign_up(input).await {
        Ok(session) => session,
        Err(e) => {
            if matches!(e, AccountError::DuplicateEmail(_)) {
                AuditEvent::new(Some(email), "auth.sign_up", AuditOutcome::Failure)
                    .with_request(&headers)
                    .with_details(serde_json::json!({ "reason": "duplicate_email" }))
                    .log();
            }
            return Err(e);
        }
    };

    AuditEvent::new(Some(session.account.email.clone()), "auth.sign_up", AuditOutcome::Success)
        .with_resource(format!("account:{}", session.account.id))
        .with_request(&headers)
        .with_details(serde_json::json!({ "roles": session.account.roles }))
        .log();

    let cookie = session_cookie(
        &session.token.token,
        session.expires_in(),
        service.config().secure_cookies,
    )?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(session.into_response()),
    ))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/sign-in",
    tag = "Auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = SessionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_in<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> AccountResult<impl IntoResponse> {
    let email = input.email.clone();
    let session = match service.sign_in(input).await {
        Ok(session) => session,
        Err(e) => {
            if matches!(e, AccountError::InvalidCredentials) {
                AuditEvent::new(Some(email), "auth.sign_in", AuditOutcome::Failure)
                    .with_request(&headers)
                    .log();
            }
            return Err(e);
        }
    };

    AuditEvent::new(Some(session.account.email.clone()), "auth.sign_in", AuditOutcome::Success)
        .with_resource(format!("account:{}", session.account.id))
        .with_request(&headers)
        .log();

    let cookie = session_cookie(
        &session.token.token,
        session.expires_in(),
        service.config().secure_cookies,
    )?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(session.into_response()),
    ))
}

/// Revoke the current session and clear the cookie
///
/// Succeeds without a token, or with one that is already revoked or expired.
#[utoipa::path(
    post,
    path = "/sign-out",
    tag = "Auth",
    responses(
        (status = 204, description = "Signed out, session cookie cleared"),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    security((), ("bearer_auth" = []))
)]
async fn sign_out<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
) -> AccountResult<impl IntoResponse> {
    let revoked = match extract_token_from_headers(&headers) {
        Some(token) => service.sign_out(&token).await?,
        None => None,
    };

    if let Some(claims) = revoked {
        AuditEvent::new(Some(claims.email), "auth.sign_out", AuditOutcome::Success)
            .with_resource(format!("account:{}", claims.sub))
            .with_request(&headers)
            .log();
    }

    let cleared = session_cookie("", 0, service.config().secure_cookies)?;
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, cleared)]),
    ))
}

/// The signed-in account
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn me<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    AuthUser(claims): AuthUser,
) -> AccountResult<Json<AccountResponse>> {
    let account = service.current_user(&claims).await?;
    Ok(Json(account.into()))
}
