//! Caller identity and the session cookie.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::config::SessionConfig;

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(Session),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(session) => Some(&session.username),
            Identity::Anonymous => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Identity::Authenticated(session) => Some(session),
            Identity::Anonymous => None,
        }
    }
}

/// Find the session id in the `Cookie` header(s).
///
/// Unparseable values are treated as absent.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim_matches('"')).ok())
}

/// `Set-Cookie` value that stores `session_id`.
pub fn session_cookie(config: &SessionConfig, session_id: &Uuid) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, session_id, config.ttl_secs
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    )
}
