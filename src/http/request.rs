//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Typed request bodies for the auth endpoints
//! - Resolve the caller's `Identity` from the session cookie
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Identity extraction never rejects; anonymous is a valid identity

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderName},
};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::auth::identity::session_id_from_headers;
use crate::auth::Identity;
use crate::http::server::AppState;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns an `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// `POST /djangoapp/login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

/// `POST /djangoapp/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);

        let identity = session_id_from_headers(&parts.headers, &app.config.sessions.cookie_name)
            .and_then(|id| app.sessions.get(&id))
            .map(Identity::Authenticated)
            .unwrap_or(Identity::Anonymous);

        Ok(identity)
    }
}
