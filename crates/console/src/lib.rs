//! `midplat-console` — the console's client-side session plumbing.
//!
//! Route guarding, the backend seam used to fetch the current user, its
//! permissions and menus, token storage, and list helpers used by the
//! distributor views.

pub mod backend;
pub mod config;
pub mod distributors;
pub mod error;
pub mod guard;
pub mod session;
pub mod token;

pub use backend::{AuthBackend, HttpAuthBackend};
pub use config::{ConfigError, ConsoleConfig};
pub use error::ApiError;
pub use guard::{GuardOutcome, RouteGuard, RouteMeta};
pub use session::Session;
pub use token::{MemoryTokenStore, TokenStore};
