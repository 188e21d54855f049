//! Login, logout and registration.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::identity::{expired_session_cookie, session_cookie};
use crate::auth::{AuthError, Identity, NewUser, Session};
use crate::http::request::{LoginRequest, RegistrationRequest};
use crate::http::response::{ApiError, AuthResponse};
use crate::http::server::AppState;

pub async fn login(
    State(state): State<AppState>,
    identity: Identity,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::BadRequest
    })?;

    let users = state.users.clone();
    let user_name = request.user_name.clone();
    let password = request.password;
    let user = tokio::task::spawn_blocking(move || users.authenticate(&user_name, &password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match user {
        Some(user) => {
            end_session(&state, &identity);
            let session = state.sessions.create(&user.username);
            tracing::info!(username = %user.username, "User logged in");
            Ok(with_session(&state, &session, AuthResponse::authenticated(user.username)))
        }
        None => {
            tracing::warn!(username = %request.user_name, "Login failed");
            Ok((StatusCode::UNAUTHORIZED, Json(AuthResponse::rejected(request.user_name))).into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>, identity: Identity) -> Response {
    if let Some(username) = identity.username() {
        tracing::info!(username = %username, "User logged out");
    }
    end_session(&state, &identity);

    (
        [(header::SET_COOKIE, expired_session_cookie(&state.config.sessions))],
        Json(AuthResponse::logged_out()),
    )
        .into_response()
}

pub async fn registration(
    State(state): State<AppState>,
    identity: Identity,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected registration body");
        ApiError::BadRequest
    })?;

    // Cheap pre-check; the store re-checks atomically on insert.
    if state.users.exists(&request.user_name) {
        return Ok(already_registered(request.user_name));
    }

    let users = state.users.clone();
    let new_user = NewUser {
        username: request.user_name.clone(),
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
    };
    let created = tokio::task::spawn_blocking(move || users.create(new_user))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match created {
        Ok(user) => {
            end_session(&state, &identity);
            let session = state.sessions.create(&user.username);
            Ok(with_session(&state, &session, AuthResponse::authenticated(user.username)))
        }
        Err(AuthError::AlreadyRegistered(name)) => Ok(already_registered(name)),
        Err(AuthError::EmptyUsername) => Err(ApiError::BadRequest),
        Err(e @ AuthError::Hash(_)) => Err(ApiError::Internal(e.to_string())),
    }
}

/// Registration only accepts POST.
pub async fn invalid_registration_method() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "Invalid request" })),
    )
        .into_response()
}

fn already_registered(user_name: String) -> Response {
    tracing::info!(username = %user_name, "Registration for existing user");
    (StatusCode::CONFLICT, Json(AuthResponse::already_registered(user_name))).into_response()
}

fn end_session(state: &AppState, identity: &Identity) {
    if let Some(session) = identity.session() {
        state.sessions.remove(&session.id);
    }
}

fn with_session(state: &AppState, session: &Session, body: AuthResponse) -> Response {
    (
        [(header::SET_COOKIE, session_cookie(&state.config.sessions, &session.id))],
        Json(body),
    )
        .into_response()
}
