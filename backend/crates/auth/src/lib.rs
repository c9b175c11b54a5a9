//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations, OAuth provider adapter
//! - `presentation/` - HTTP handlers, forms, views, router, middleware
//!
//! ## Features
//! - Local registration/login with username + password
//! - Sign-in via external OAuth providers (Google, Facebook) using the
//!   authorization-code grant; provider identities are normalized into the
//!   same internal Identity as local accounts
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Soft authorization gate: anonymous requests to protected routes are
//!   redirected to the login page, never answered with 401
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, cleartext zeroized after use
//! - Login failure is identical for unknown user and wrong password
//! - OAuth callback protected by a CSRF state cookie
//! - Session resolution degrades to anonymous on any token problem

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session::CurrentIdentity;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
