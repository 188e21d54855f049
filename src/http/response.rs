//! Response payloads and error mapping.
//!
//! # Responsibilities
//! - Typed JSON bodies for every endpoint
//! - Map handler errors to `{status, message}` payloads
//!
//! # Design Decisions
//! - The transport status mirrors the `status` field of the payload, so
//!   clients can rely on either
//! - Upstream failure details are logged at the client boundary and never
//!   echoed to callers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CarModel;
use crate::upstream::{Dealer, DealerLookup, ScoredReview, UpstreamError};

/// Errors a handler can return. Each maps to a fixed status and message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid dealer id, malformed credentials body.
    #[error("Bad Request")]
    BadRequest,

    /// Anonymous caller on an endpoint that needs a session.
    #[error("Unauthorized")]
    Forbidden,

    /// Review body could not be parsed or lacks text/dealership.
    #[error("Error in posting review")]
    InvalidReview,

    /// The dealership backend or the sentiment analyzer failed.
    #[error("Upstream service unavailable")]
    Upstream(#[from] UpstreamError),

    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidReview => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        let status = self.status_code();
        let body = StatusPayload {
            status: status.as_u16(),
            message: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// `{status}` or `{status, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusPayload {
    pub fn ok() -> Self {
        Self {
            status: 200,
            message: None,
        }
    }
}

/// Login, logout and registration replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl AuthResponse {
    pub fn authenticated(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            status: Some("Authenticated"),
            error: None,
        }
    }

    /// Failed login: echo the name, no status.
    pub fn rejected(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            status: None,
            error: None,
        }
    }

    pub fn already_registered(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            status: None,
            error: Some("Already Registered"),
        }
    }

    pub fn logged_out() -> Self {
        Self::rejected("")
    }
}

/// One flattened catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarEntry {
    #[serde(rename = "CarModel")]
    pub car_model: String,
    #[serde(rename = "CarMake")]
    pub car_make: String,
}

impl From<CarModel> for CarEntry {
    fn from(model: CarModel) -> Self {
        Self {
            car_model: model.name,
            car_make: model.make,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CarsResponse {
    #[serde(rename = "CarModels")]
    pub car_models: Vec<CarEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealersResponse {
    pub status: u16,
    pub dealers: Vec<Dealer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealerResponse {
    pub status: u16,
    pub dealer: DealerLookup,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewsResponse {
    pub status: u16,
    pub reviews: Vec<ScoredReview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
