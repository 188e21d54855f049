//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! login / registration:
//!     credentials → users.rs (UserStore: argon2 verify / create)
//!     → sessions.rs (SessionStore: open session)
//!     → identity.rs (Set-Cookie with session id)
//!
//! every other request:
//!     Cookie header → identity.rs (session id)
//!     → sessions.rs (lookup, lazy expiry)
//!     → Identity::Authenticated | Identity::Anonymous
//! ```
//!
//! # Design Decisions
//! - Stores sit behind traits so deployments can swap in persistent backends
//! - Handlers receive an explicit `Identity`, never ambient request state

pub mod identity;
pub mod sessions;
pub mod users;

pub use identity::Identity;
pub use sessions::{InMemorySessionStore, Session, SessionStore};
pub use users::{AuthError, InMemoryUserStore, NewUser, User, UserStore};
