//! External service access.
//!
//! # Data Flow
//! ```text
//! handler
//!     → enrich.rs (bounded, order-preserving sentiment fan-out)
//!     → client.rs (UpstreamClient: URL building, timeout, JSON decode)
//!     → query.rs (query strings, path segments)
//!     → dealership backend / sentiment analyzer
//!     ← types.rs (typed records or UpstreamError)
//! ```
//!
//! # Design Decisions
//! - Every call returns a `Result`; handlers must branch on it
//! - Failures are logged here, once, at the boundary
//! - Base URLs come from `AppConfig`, never from globals

pub mod client;
pub mod enrich;
pub mod query;
pub mod types;

pub use client::UpstreamClient;
pub use enrich::score_reviews;
pub use query::build_query_string;
pub use types::{
    Dealer, DealerLookup, NewReview, Review, ScoredReview, SentimentResponse, UpstreamError,
    UpstreamResult,
};
