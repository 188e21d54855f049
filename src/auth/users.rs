//! User credential storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

/// Errors raised by user stores.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A registered user. The password is only ever held as an argon2 hash.
#[derive(Clone)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Capability interface for user persistence and credential checks.
pub trait UserStore: Send + Sync {
    /// True if `username` is taken.
    fn exists(&self, username: &str) -> bool;

    /// Create a user. Fails with `AlreadyRegistered` if the name is taken;
    /// the check and the insert are atomic.
    fn create(&self, user: NewUser) -> Result<User, AuthError>;

    /// Return the user if `password` matches.
    fn authenticate(&self, username: &str, password: &str) -> Option<User>;

    /// Number of registered users.
    fn count(&self) -> usize;
}

/// Process-local user store.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    fn create(&self, user: NewUser) -> Result<User, AuthError> {
        if user.username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if self.exists(&user.username) {
            return Err(AuthError::AlreadyRegistered(user.username));
        }

        // Hash outside the map lock; the entry check below settles races.
        let password_hash = hash_password(&user.password)?;

        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(AuthError::AlreadyRegistered(user.username)),
            Entry::Vacant(slot) => {
                let record = User {
                    username: user.username,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    password_hash,
                };
                slot.insert(record.clone());
                tracing::info!(username = %record.username, "User registered");
                Ok(record)
            }
        }
    }

    fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let user = self.users.get(username)?.value().clone();
        if verify_password(password, &user.password_hash) {
            Some(user)
        } else {
            None
        }
    }

    fn count(&self) -> usize {
        self.users.len()
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            false
        }
    }
}
