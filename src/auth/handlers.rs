use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest, SignupResponse},
        password::{hash_password_blocking, verify_password_blocking},
        repo::StoreError,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// A body that never arrived or is not JSON is "no data"; JSON of the wrong shape is named as such.
fn body_rejected(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection, "request body rejected");
    match rejection {
        JsonRejection::JsonDataError(_) => ApiError::Validation("Invalid request body".into()),
        _ => ApiError::Validation("No data received".into()),
    }
}

/// Translates a store failure into the client-facing error, logging the detail.
fn store_failure(e: StoreError) -> ApiError {
    match e {
        StoreError::UniqueViolation(Some(field)) => {
            warn!(%field, "duplicate user");
            ApiError::Conflict(format!("{field} already exists"))
        }
        StoreError::UniqueViolation(None) => {
            warn!("duplicate user on unrecognised constraint");
            ApiError::Conflict("User already exists".into())
        }
        StoreError::Database(e) => {
            error!(error = %e, "database error");
            ApiError::Database
        }
        StoreError::Connection(e) => {
            error!(error = %e, "no database connection");
            ApiError::Internal
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    info!("signup request");
    let Json(payload) = payload.map_err(body_rejected)?;

    let signup = payload.validate().map_err(|e| {
        warn!(reason = %e, "invalid signup payload");
        e
    })?;

    let hash = hash_password_blocking(signup.password.clone())
        .await
        .map_err(|e| {
            error!(error = %e, "hash_password failed");
            ApiError::Internal
        })?;

    let user = signup.into_new_user(hash);
    state.users.insert(&user).await.map_err(store_failure)?;

    info!(username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "User registered successfully".into(),
            timestamp: OffsetDateTime::now_utc(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("login request");
    let Json(payload) = payload.map_err(body_rejected)?;
    let (username, password) = payload.validate()?;

    let user = match state.users.find_by_username(&username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%username, "login unknown username");
            return Err(ApiError::Authentication);
        }
        Err(e) => return Err(store_failure(e)),
    };

    let ok = verify_password_blocking(password, user.password_hash)
        .await
        .map_err(|e| {
            error!(error = %e, %username, "verify_password failed");
            ApiError::Internal
        })?;

    if !ok {
        warn!(%username, "login invalid password");
        return Err(ApiError::Authentication);
    }

    info!(%username, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        user: PublicUser {
            username: user.username,
            email: user.email,
        },
    }))
}
