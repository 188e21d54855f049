//! Typed client for the dealership review service.

pub mod client;

pub use client::{ApiResponse, DealershipClient, ReviewRequest};
