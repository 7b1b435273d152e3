use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::ValidatedJson;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{StaffError, StaffResult};
use crate::models::{
    ActivateRequest, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest,
    SendEmailRequest, TokenPairResponse, UpdateUserRequest, User, UserResponse,
};
use crate::repository::StaffRepository;
use crate::service::StaffService;

/// Auth endpoints: register, activate, login, refresh, logout
pub fn auth_router<R: StaffRepository + 'static>(service: Arc<StaffService<R>>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/activate", post(activate))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .with_state(service)
}

/// User management endpoints
pub fn users_router<R: StaffRepository + 'static>(service: Arc<StaffService<R>>) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(service)
}

/// Ad-hoc email endpoint
pub fn email_router<R: StaffRepository + 'static>(service: Arc<StaffService<R>>) -> Router {
    Router::new()
        .route("/send", post(send_email))
        .with_state(service)
}

fn extract_token(headers: &HeaderMap) -> StaffResult<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
        .ok_or(StaffError::TokenInvalid)
}

async fn current_actor<R: StaffRepository>(
    service: &StaffService<R>,
    headers: &HeaderMap,
) -> StaffResult<User> {
    let token = extract_token(headers)?;
    service.resolve_actor(&token).await
}

/// Register a new staff member
///
/// POST /auth/register
async fn register<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> StaffResult<impl IntoResponse> {
    let actor = current_actor(&service, &headers).await?;
    let user = service.register(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Activate a pending account
///
/// POST /auth/activate
async fn activate<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    ValidatedJson(input): ValidatedJson<ActivateRequest>,
) -> StaffResult<Json<UserResponse>> {
    let user = service.activate(input).await?;
    Ok(Json(user))
}

/// Login with email and password
///
/// POST /auth/login
async fn login<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> StaffResult<Json<TokenPairResponse>> {
    let pair = service.login(input).await?;
    Ok(Json(pair))
}

/// Rotate a refresh token
///
/// POST /auth/refresh
async fn refresh<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> StaffResult<Json<TokenPairResponse>> {
    let pair = service.refresh(input).await?;
    Ok(Json(pair))
}

/// Logout (stateless acknowledgement)
///
/// POST /auth/logout
async fn logout<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
) -> StaffResult<Json<MessageResponse>> {
    let actor = current_actor(&service, &headers).await?;
    Ok(Json(service.logout(&actor)))
}

/// List all users
///
/// GET /users
async fn list_users<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
) -> StaffResult<Json<Vec<UserResponse>>> {
    current_actor(&service, &headers).await?;
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Get a user by ID
///
/// GET /users/:id
async fn get_user<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> StaffResult<Json<UserResponse>> {
    current_actor(&service, &headers).await?;
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user
///
/// PATCH /users/:id
async fn update_user<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> StaffResult<Json<UserResponse>> {
    let actor = current_actor(&service, &headers).await?;
    let user = service.update_user(&actor, id, input).await?;
    Ok(Json(user))
}

/// Delete a user
///
/// DELETE /users/:id
async fn delete_user<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> StaffResult<impl IntoResponse> {
    let actor = current_actor(&service, &headers).await?;
    service.remove_user(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Send an ad-hoc email
///
/// POST /email/send
async fn send_email<R: StaffRepository>(
    State(service): State<Arc<StaffService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SendEmailRequest>,
) -> StaffResult<Json<MessageResponse>> {
    current_actor(&service, &headers).await?;
    let message = service.send_email(input).await?;
    Ok(Json(message))
}
