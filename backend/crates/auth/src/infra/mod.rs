//! Infrastructure Layer
//!
//! Database implementations and external provider integrations.

pub mod oauth;
pub mod postgres;

pub use oauth::OAuthClient;
pub use postgres::PgAuthRepository;
