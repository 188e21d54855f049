//! Request handlers, one module per endpoint group.

pub mod auth;
pub mod catalog;
pub mod dealers;
