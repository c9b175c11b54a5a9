//! Secrets (Content Store) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Secret entity and repository trait
//! - `application/` - Use cases
//! - `infra/` - Database implementation
//! - `presentation/` - HTTP handlers, views, router
//!
//! ## Authorization Model
//! - This crate performs no authentication itself; the routes are mounted
//!   behind the auth crate's `require_identity` middleware, which inserts
//!   the resolved `CurrentIdentity` into request extensions
//! - `list_all` intentionally ignores the caller: the "all secrets" view
//!   shows every posted item to any authenticated identity
//! - Secrets are never mutated or deleted once created

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{SecretsError, SecretsResult};
pub use infra::postgres::PgSecretRepository;
pub use presentation::router::secrets_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
