//! Sentiment enrichment of dealer reviews.

use futures_util::stream::{self, StreamExt};

use crate::upstream::client::UpstreamClient;
use crate::upstream::types::{Review, ScoredReview};

/// Attach a sentiment label to every review.
///
/// At most `max_concurrency` analyzer calls are in flight; output order always
/// matches input order. A failed analysis, or a review without text, leaves
/// that review's sentiment empty instead of failing the whole listing.
pub async fn score_reviews(
    client: &UpstreamClient,
    reviews: Vec<Review>,
    max_concurrency: usize,
) -> Vec<ScoredReview> {
    stream::iter(reviews)
        .map(|review| async move {
            let sentiment = match review.review.as_deref() {
                Some(text) => match client.analyze_sentiment(text).await {
                    Ok(reply) => reply.sentiment,
                    Err(_) => None,
                },
                None => None,
            };
            ScoredReview { review, sentiment }
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await
}
