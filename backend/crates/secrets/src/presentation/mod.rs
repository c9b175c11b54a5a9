//! Presentation Layer
//!
//! HTTP handlers, forms, views, and router.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod views;

pub use handlers::SecretsAppState;
pub use router::{secrets_router, secrets_router_generic};
