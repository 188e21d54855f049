//! Dealer listings, details, reviews and review submission.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::auth::Identity;
use crate::http::response::{ApiError, DealerResponse, DealersResponse, ReviewsResponse, StatusPayload};
use crate::http::server::AppState;
use crate::upstream::{score_reviews, NewReview};

/// Dealers in every state.
pub async fn get_dealerships(State(state): State<AppState>) -> Result<Json<DealersResponse>, ApiError> {
    list_dealerships(&state, "All").await
}

/// Dealers in one state ("All" lists every state).
pub async fn get_dealerships_by_state(
    State(state): State<AppState>,
    Path(us_state): Path<String>,
) -> Result<Json<DealersResponse>, ApiError> {
    list_dealerships(&state, &us_state).await
}

async fn list_dealerships(state: &AppState, us_state: &str) -> Result<Json<DealersResponse>, ApiError> {
    let dealers = state.upstream.fetch_dealers(us_state).await?;
    tracing::debug!(state = %us_state, count = dealers.len(), "Dealers fetched");

    Ok(Json(DealersResponse { status: 200, dealers }))
}

pub async fn get_dealer_details(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DealerResponse>, ApiError> {
    let dealer_id = parse_dealer_id(&raw_id)?;
    let dealer = state.upstream.fetch_dealer(dealer_id).await?;

    Ok(Json(DealerResponse { status: 200, dealer }))
}

pub async fn get_dealer_reviews(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let dealer_id = parse_dealer_id(&raw_id)?;
    let reviews = state.upstream.fetch_reviews(dealer_id).await?;

    let reviews = score_reviews(
        &state.upstream,
        reviews,
        state.config.sentiment.max_concurrency,
    )
    .await;

    let unscored = reviews.iter().filter(|r| r.sentiment.is_none()).count();
    if unscored > 0 {
        tracing::warn!(dealer_id, unscored, "Some reviews could not be scored");
    }

    Ok(Json(ReviewsResponse { status: 200, reviews }))
}

/// Dealer routes hit without an id.
pub async fn missing_dealer_id() -> ApiError {
    ApiError::BadRequest
}

pub async fn add_review(
    State(state): State<AppState>,
    identity: Identity,
    body: Result<Json<NewReview>, JsonRejection>,
) -> Result<Json<StatusPayload>, ApiError> {
    let Some(username) = identity.username() else {
        return Err(ApiError::Forbidden);
    };

    let Json(mut review) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected review body");
        ApiError::InvalidReview
    })?;
    if !review.is_complete() {
        return Err(ApiError::InvalidReview);
    }
    if review.is_anonymous() {
        review.name = Some(username.to_string());
    }

    state.upstream.post_review(&review).await?;
    tracing::info!(username = %username, dealership = review.dealership, "Review submitted");

    Ok(Json(StatusPayload::ok()))
}

/// Dealer ids are positive integers; anything else is a bad request.
pub fn parse_dealer_id(raw: &str) -> Result<u64, ApiError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dealer_id() {
        assert_eq!(parse_dealer_id("15").unwrap(), 15);
        assert_eq!(parse_dealer_id(" 7 ").unwrap(), 7);
        for bad in ["", "0", "-3", "abc", "1.5"] {
            assert!(matches!(parse_dealer_id(bad), Err(ApiError::BadRequest)), "{bad}");
        }
    }
}
