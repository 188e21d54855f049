//! Records exchanged with the dealership backend and the sentiment analyzer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while calling an external service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, reset, ...
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured timeout.
    #[error("request to {url} timed out after {secs} seconds")]
    Timeout { url: String, secs: u64 },

    /// The service answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not JSON, or not the JSON we expected.
    #[error("invalid response body from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
            UpstreamError::Client(_) => "client",
        }
    }
}

/// Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// A dealership as served by the backend.
///
/// Only `id` is interpreted here. Every other field (names, city, state, zip,
/// coordinates, ...) is kept in `fields` exactly as received, explicit nulls
/// included, and returned to callers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Dealer {
    /// A string field by name, if present and a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// `/fetchDealer/{id}` answers with either a record or a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DealerLookup {
    One(Dealer),
    Many(Vec<Dealer>),
}

/// A stored review.
///
/// Only the review text is interpreted (it is what gets scored). Reviewer
/// name, purchase details, car make/model/year and anything else the backend
/// stores pass through in `fields`, nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub review: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A review together with its sentiment label.
///
/// `sentiment` is `None` (serialized as `null`) when the analyzer could not
/// be reached for this review, or the review has no text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: Option<String>,
}

/// A review submitted by an authenticated user, forwarded to `/insert_review`.
///
/// Fields other than the reviewer name, dealership and text are forwarded as
/// sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub dealership: u64,
    pub review: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewReview {
    /// A review must carry text and the dealership it belongs to.
    pub fn is_complete(&self) -> bool {
        !self.review.trim().is_empty() && self.dealership != 0
    }

    /// Whether the submitter left the reviewer name out (missing, null or blank).
    pub fn is_anonymous(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
    }
}

/// Browser forms send the dealership id from the URL, i.e. as a string.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Sentiment analyzer reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub sentiment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dealer_keeps_unknown_fields() {
        let raw = json!({
            "id": 15,
            "city": "El Paso",
            "state": "Texas",
            "st": "TX",
            "address": "3 Nova Court",
            "zip": "88563",
            "lat": 31.6948,
            "long": -106.3,
            "short_name": "Holdlamis",
            "full_name": "Holdlamis Car Dealership"
        });

        let dealer: Dealer = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(dealer.id, 15);
        assert_eq!(dealer.text("st"), Some("TX"));
        assert_eq!(dealer.fields.get("zip"), Some(&json!("88563")));
        assert_eq!(serde_json::to_value(&dealer).unwrap(), raw);
    }

    #[test]
    fn test_dealer_keeps_explicit_nulls() {
        let raw = json!({"id": 4, "city": null, "state": "Kansas", "address": null});

        let dealer: Dealer = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(dealer.text("city"), None);
        assert_eq!(serde_json::to_value(&dealer).unwrap(), raw);
    }

    #[test]
    fn test_dealer_lookup_accepts_record_or_list() {
        let one: DealerLookup = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(matches!(one, DealerLookup::One(_)));

        let many: DealerLookup = serde_json::from_value(json!([{"id": 1}])).unwrap();
        assert!(matches!(many, DealerLookup::Many(ref d) if d.len() == 1));
    }

    #[test]
    fn test_scored_review_flattens() {
        let review: Review = serde_json::from_value(json!({
            "id": 3,
            "name": "Berkly Shepley",
            "dealership": 15,
            "review": "great service",
            "purchase": true,
            "car_year": 2008
        }))
        .unwrap();

        let scored = ScoredReview {
            review,
            sentiment: Some("positive".to_string()),
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["review"], "great service");
        assert_eq!(value["sentiment"], "positive");
        assert_eq!(value["car_year"], 2008);
    }

    #[test]
    fn test_review_with_null_fields_decodes() {
        let raw = json!({
            "id": 2,
            "name": null,
            "dealership": 15,
            "review": "bad",
            "purchase": null
        });

        let review: Review = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(review.review.as_deref(), Some("bad"));
        assert_eq!(serde_json::to_value(&review).unwrap(), raw);
    }

    #[test]
    fn test_new_review_forwards_unknown_fields_and_nulls() {
        let review: NewReview = serde_json::from_value(json!({
            "name": null,
            "dealership": 15,
            "review": "ok",
            "purchase": null,
            "time": "2024-01-01",
            "source": "web"
        }))
        .unwrap();
        assert!(review.is_anonymous());

        let forwarded = serde_json::to_value(&review).unwrap();
        assert_eq!(
            forwarded,
            json!({
                "dealership": 15,
                "review": "ok",
                "purchase": null,
                "time": "2024-01-01",
                "source": "web"
            })
        );
    }

    #[test]
    fn test_new_review_completeness() {
        let mut review: NewReview =
            serde_json::from_value(json!({"dealership": 15, "review": "Fine"})).unwrap();
        assert!(review.is_complete());

        review.review = "   ".to_string();
        assert!(!review.is_complete());
    }

    #[test]
    fn test_new_review_accepts_string_dealership() {
        let review: NewReview =
            serde_json::from_value(json!({"dealership": "15", "review": "Fine"})).unwrap();
        assert_eq!(review.dealership, 15);
        assert!(review.is_anonymous());

        let bad = serde_json::from_value::<NewReview>(json!({"dealership": "abc", "review": "Fine"}));
        assert!(bad.is_err());
    }
}
