//! Dealership Review Service Library

pub mod auth;
pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
