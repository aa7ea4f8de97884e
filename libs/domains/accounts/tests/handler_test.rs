//! Handler tests for the Accounts domain
//!
//! These drive `handlers::router` with the in-memory repository and token store:
//! - sign-up / sign-in set the session cookie and return a token
//! - duplicate emails, bad credentials and validation errors
//! - `/me` with bearer header and cookie, sign-out revocation

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{ErrorResponse, InMemoryTokenStore, JwtAuth, JwtConfig};
use domain_accounts::*;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "handler-tests-secret-with-at-least-32-chars";

fn app() -> Router {
    let auth = JwtAuth::new(
        &JwtConfig::new(SECRET, 900).unwrap(),
        Arc::new(InMemoryTokenStore::new()),
    );
    let service = AccountService::new(
        InMemoryAccountRepository::new(),
        auth,
        AccountsConfig::new(["desk@campus.edu"], false),
    );
    handlers::router(service)
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn credentials(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

fn set_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn signed_up(app: &Router, email: &str) -> SessionResponse {
    let response = send(app, post_json("/sign-up", credentials(email, "long enough"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

fn me_with_bearer(token: &str) -> Request<Body> {
    Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_sign_up_sets_cookie_and_returns_session() {
    let app = app();
    let response = send(&app, post_json("/sign-up", credentials("Student@Campus.edu", "long enough"))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"));

    let session: SessionResponse = json_body(response.into_body()).await;
    assert_eq!(session.account.email, "student@campus.edu");
    assert_eq!(session.account.roles, vec![Role::User]);
    assert_eq!(session.token_type, "Bearer");
    assert!(session.expires_in > 0 && session.expires_in <= 900);
    assert!(cookie.contains(&session.access_token));
}

#[tokio::test]
async fn test_sign_up_response_never_contains_password_hash() {
    let app = app();
    let response = send(&app, post_json("/sign-up", credentials("a@campus.edu", "long enough"))).await;
    let body: serde_json::Value = json_body(response.into_body()).await;

    assert!(body["account"].get("password_hash").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_admin_email_gets_admin_role() {
    let app = app();
    let session = signed_up(&app, "DESK@campus.edu").await;
    assert_eq!(session.account.roles, vec![Role::User, Role::Admin]);
}

#[tokio::test]
async fn test_duplicate_sign_up_returns_409() {
    let app = app();
    signed_up(&app, "a@campus.edu").await;

    let response = send(&app, post_json("/sign-up", credentials("A@campus.edu", "something else"))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "CONFLICT");
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = app();
    let response = send(&app, post_json("/sign-up", credentials("a@campus.edu", "short"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert!(body.details.unwrap().to_string().contains("password"));
}

#[tokio::test]
async fn test_sign_in_round_trip() {
    let app = app();
    let created = signed_up(&app, "a@campus.edu").await;

    let response = send(&app, post_json("/sign-in", credentials("a@campus.edu", "long enough"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).starts_with("access_token="));

    let session: SessionResponse = json_body(response.into_body()).await;
    assert_eq!(session.account.id, created.account.id);
}

#[tokio::test]
async fn test_bad_credentials_share_one_message() {
    let app = app();
    signed_up(&app, "a@campus.edu").await;

    let wrong_password = send(&app, post_json("/sign-in", credentials("a@campus.edu", "wrong password"))).await;
    let unknown_email = send(&app, post_json("/sign-in", credentials("b@campus.edu", "long enough"))).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: ErrorResponse = json_body(wrong_password.into_body()).await;
    let b: ErrorResponse = json_body(unknown_email.into_body()).await;
    assert_eq!(a.message, "Invalid email or password");
    assert_eq!(a.message, b.message);
}

#[tokio::test]
async fn test_me_with_bearer_and_cookie() {
    let app = app();
    let session = signed_up(&app, "a@campus.edu").await;

    let response = send(&app, me_with_bearer(&session.access_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: AccountResponse = json_body(response.into_body()).await;
    assert_eq!(me, session.account);

    let by_cookie = Request::builder()
        .uri("/me")
        .header(header::COOKIE, format!("theme=dark; access_token={}", session.access_token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, by_cookie).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_a_session() {
    let app = app();
    let anonymous = Request::builder().uri("/me").body(Body::empty()).unwrap();

    let response = send(&app, anonymous).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let garbage = send(&app, me_with_bearer("not.a.token")).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_revokes_token_and_clears_cookie() {
    let app = app();
    let session = signed_up(&app, "a@campus.edu").await;

    let sign_out = Request::builder()
        .method("POST")
        .uri("/sign-out")
        .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, sign_out).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookie(&response).contains("Max-Age=0"));

    let response = send(&app, me_with_bearer(&session.access_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // again, and with no token at all
    let again = Request::builder()
        .method("POST")
        .uri("/sign-out")
        .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, again).await.status(), StatusCode::NO_CONTENT);

    let anonymous = Request::builder()
        .method("POST")
        .uri("/sign-out")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, anonymous).await.status(), StatusCode::NO_CONTENT);
}
