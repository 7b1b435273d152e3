//! Handler tests for the staff domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes, including auth failures
//! - Error responses
//!
//! They run against the in-memory repository, so no database is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_staff::*;
use email::{EmailService, MockSmtpProvider};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "handler-test-secret";

struct TestApp {
    router: Router,
    repo: InMemoryStaffRepository,
    tokens: TokenIssuer,
    mock_mail: Arc<MockSmtpProvider>,
}

fn test_app() -> TestApp {
    let repo = InMemoryStaffRepository::new();
    let tokens = TokenIssuer::new(SECRET);
    let mock_mail = Arc::new(MockSmtpProvider::new());
    let mailer = Arc::new(
        EmailService::new(mock_mail.clone(), "http://localhost:3000").expect("email service"),
    );

    let service = Arc::new(StaffService::new(repo.clone(), tokens.clone(), mailer));
    let router = Router::new()
        .nest("/auth", handlers::auth_router(service.clone()))
        .nest("/users", handlers::users_router(service.clone()))
        .nest("/email", handlers::email_router(service));

    TestApp {
        router,
        repo,
        tokens,
        mock_mail,
    }
}

/// Seed an ACTIVE user with the given role and return (user, bearer token).
async fn seed_actor(app: &TestApp, role: RoleName) -> (User, String) {
    let roles = app.repo.resolve_roles(&[role]).await.unwrap();
    let mut user = User::new(
        "Seed".into(),
        role.to_string(),
        format!("{}@example.com", Uuid::new_v4()),
        roles,
        None,
    );
    user.status = UserStatus::Active;
    let user = app.repo.create(user).await.unwrap();

    let token = app
        .tokens
        .create_access_token(user.id, &user.email)
        .unwrap();
    (user, token)
}

fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_returns_201_and_sends_activation_email() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Md).await;

    let request = json_request(
        "POST",
        "/auth/register",
        Some(&token),
        json!({
            "first_name": "New",
            "last_name": "Hire",
            "email": "New.Hire@Example.com",
            "roles": ["WORKER"]
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.email, "new.hire@example.com");
    assert_eq!(user.status, UserStatus::Pending);
    assert!(app.mock_mail.was_sent_to("new.hire@example.com").await);
}

#[tokio::test]
async fn test_register_requires_bearer_token() {
    let app = test_app();

    let request = json_request(
        "POST",
        "/auth/register",
        None,
        json!({
            "first_name": "New",
            "last_name": "Hire",
            "email": "x@example.com",
            "roles": ["WORKER"]
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Md).await;

    // Invalid email
    let request = json_request(
        "POST",
        "/auth/register",
        Some(&token),
        json!({
            "first_name": "New",
            "last_name": "Hire",
            "email": "not-an-email",
            "roles": ["WORKER"]
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Md).await;

    let body = json!({
        "first_name": "New",
        "last_name": "Hire",
        "email": "dup@example.com",
        "roles": ["WORKER"]
    });

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/auth/register", Some(&token), body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .oneshot(json_request("POST", "/auth/register", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_full_onboarding_flow() {
    let app = test_app();
    let (_, md_token) = seed_actor(&app, RoleName::Md).await;

    // Register
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            Some(&md_token),
            json!({
                "first_name": "Flow",
                "last_name": "Test",
                "email": "flow@example.com",
                "roles": ["WORKER"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: UserResponse = json_body(response.into_body()).await;

    // Activate with the stored token
    let activation_token = app
        .repo
        .get_by_id(created.id)
        .await
        .unwrap()
        .unwrap()
        .activation_token
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/activate",
            None,
            json!({ "token": activation_token, "password": "s3cret-pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let activated: UserResponse = json_body(response.into_body()).await;
    assert_eq!(activated.status, UserStatus::Active);

    // Login
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "flow@example.com", "password": "s3cret-pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let pair: TokenPairResponse = json_body(response.into_body()).await;

    // Refresh
    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rotated: TokenPairResponse = json_body(response.into_body()).await;
    assert!(!rotated.access_token.is_empty());
}

#[tokio::test]
async fn test_login_with_wrong_password_returns_401() {
    let app = test_app();

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong-pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_garbage_token_returns_401() {
    let app = test_app();

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": "not.a.jwt" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_returns_message() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Worker).await;

    let response = app
        .router
        .oneshot(empty_request("POST", "/auth/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Logout successful.");
}

#[tokio::test]
async fn test_get_user_returns_200_and_404() {
    let app = test_app();
    let (md, token) = seed_actor(&app, RoleName::Md).await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", &format!("/users/{}", md.id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.id, md.id);
    assert!(user.permissions.contains(&"DELETE_STAFF".to_string()));

    let missing = Uuid::new_v4();
    let response = app
        .router
        .oneshot(empty_request("GET", &format!("/users/{}", missing), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_requires_auth() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Worker).await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/users/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .oneshot(empty_request("GET", "/users/", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let users: Vec<UserResponse> = json_body(response.into_body()).await;
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_delete_own_account_returns_403() {
    let app = test_app();
    let (md, token) = seed_actor(&app, RoleName::Md).await;

    let response = app
        .router
        .oneshot(empty_request(
            "DELETE",
            &format!("/users/{}", md.id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_hr_cannot_delete_md() {
    let app = test_app();
    let (md, _) = seed_actor(&app, RoleName::Md).await;
    let (_, hr_token) = seed_actor(&app, RoleName::Hr).await;

    let response = app
        .router
        .oneshot(empty_request(
            "DELETE",
            &format!("/users/{}", md.id),
            Some(&hr_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_md_deletes_worker_returns_204() {
    let app = test_app();
    let (_, md_token) = seed_actor(&app, RoleName::Md).await;
    let (worker, _) = seed_actor(&app, RoleName::Worker).await;

    let response = app
        .router
        .oneshot(empty_request(
            "DELETE",
            &format!("/users/{}", worker.id),
            Some(&md_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_update_user_via_patch() {
    let app = test_app();
    let (_, md_token) = seed_actor(&app, RoleName::Md).await;
    let (worker, _) = seed_actor(&app, RoleName::Worker).await;

    let response = app
        .router
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}", worker.id),
            Some(&md_token),
            json!({ "first_name": "Renamed", "roles": ["HR"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: UserResponse = json_body(response.into_body()).await;
    assert_eq!(updated.first_name, "Renamed");
    assert_eq!(updated.roles, vec!["HR".to_string()]);
}

#[tokio::test]
async fn test_send_email_endpoint() {
    let app = test_app();
    let (_, token) = seed_actor(&app, RoleName::Hr).await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/email/send",
            Some(&token),
            json!({
                "recipients": ["a@example.com", "b@example.com"],
                "subject": "Schedule update",
                "text": "The rota changed."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.mock_mail.sent_count().await, 1);
    assert!(app.mock_mail.was_sent_to("a@example.com").await);
    assert!(app.mock_mail.was_sent_to("b@example.com").await);
}
