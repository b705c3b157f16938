use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, SignupRequest},
        repo_types::User,
        services::{hash_password, is_valid_email, verify_password, JwtKeys},
    },
    db::is_unique_violation,
    error::{ApiResult, AppError},
    extract::JsonBody,
    state::AppState,
};

const ALREADY_REGISTERED: &str = "Email or username already registered";
const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

fn normalize_email(raw: &str) -> ApiResult<String> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    Ok(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let email = normalize_email(&payload.email)?;
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".into()));
    }

    if User::find_by_email(&state.db, &email).await?.is_some()
        || User::find_by_username(&state.db, username).await?.is_some()
    {
        warn!(email = %email, username = %username, "signup with taken identity");
        return Err(AppError::BadRequest(ALREADY_REGISTERED.into()));
    }

    let hash = hash_password(&payload.password)?;

    // A concurrent signup can still win the race; the unique constraints catch it.
    let user = match User::create(&state.db, &email, username, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::BadRequest(ALREADY_REGISTERED.into()));
        }
        Err(e) => return Err(e.into()),
    };

    let access_token = JwtKeys::from_ref(&state).sign_access(&user.username)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::bearer(
            "User created successfully",
            user.into(),
            access_token,
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email)?;

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    }

    let access_token = JwtKeys::from_ref(&state).sign_access(&user.username)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse::bearer(
        "Login successful",
        user.into(),
        access_token,
    )))
}
