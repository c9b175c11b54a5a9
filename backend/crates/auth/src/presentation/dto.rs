//! Form and query payloads

use serde::Deserialize;

/// Registration form (POST /register)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// Login form (POST /login)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Provider callback query (GET /auth/{provider}/callback)
///
/// The provider sends either `code` + `state` (success) or `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
