//! Signup, user and category routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{AppState, error::ApiError, middleware::AuthSession};
use expensa_core::directory::{Account, Category, NewUser, SignUp, User};
use expensa_shared::AppError;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/signup", post(sign_up))
}

/// Routes that require the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/users", get(list_users).post(add_user))
        .route("/categories", get(list_categories))
}

/// Response for signup and user creation: the user and a token to act as
/// them.
#[derive(Debug, Serialize)]
pub struct IssuedUser {
    /// The account the user belongs to.
    pub account: Account,
    /// The user.
    pub user: User,
    /// Bearer token for the user.
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// A category with its budget usage.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// The category.
    #[serde(flatten)]
    pub category: Category,
    /// Budget left this month; negative when overspent.
    pub remaining_budget: Decimal,
    /// True when spend exceeds the budget.
    pub over_budget: bool,
}

fn issue(state: &AppState, account: Account, user: User) -> Result<IssuedUser, ApiError> {
    let access_token = state
        .jwt_service
        .generate_access_token(
            user.id.into_inner(),
            account.id.into_inner(),
            user.role.as_str(),
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(IssuedUser {
        account,
        user,
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST `/signup` - Create an account and its administrator.
async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUp>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let (account, admin) = state.directory.sign_up(request).await?;
    let issued = issue(&state, account, admin)?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// GET `/me` - The caller and their account.
async fn me(AuthSession(session): AuthSession) -> impl IntoResponse {
    Json(serde_json::json!({
        "user": session.user(),
        "account": session.account(),
    }))
}

/// GET `/users` - Users of the caller's account.
async fn list_users(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.directory.users(&session).await?;
    Ok(Json(serde_json::json!({ "users": users })))
}

/// POST `/users` - Add a user to the caller's account (Admin only).
async fn add_user(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let user = state.directory.add_user(&session, request).await?;
    let issued = issue(&state, session.account().clone(), user)?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// GET `/categories` - Categories with budget usage.
async fn list_categories(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    let categories: Vec<_> = state
        .directory
        .categories(&session)
        .await?
        .into_iter()
        .map(|category| CategoryResponse {
            remaining_budget: category.remaining_budget(),
            over_budget: category.is_over_budget(),
            category,
        })
        .collect();
    Ok(Json(serde_json::json!({ "categories": categories })))
}
