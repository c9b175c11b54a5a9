//! Presentation Layer
//!
//! HTTP handlers, forms, views, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, require_identity};
pub use router::{auth_router, auth_router_generic};
