//! External Provider Value Object
//!
//! The two supported OAuth providers. The rest of the system never
//! distinguishes how an identity authenticated; this enum only exists at
//! the adapter boundary and in the provider-link storage key.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported external identity providers
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[display("google")]
    Google,
    #[display("facebook")]
    Facebook,
}

impl Provider {
    /// Stable storage/routing name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }

    /// All supported providers
    pub const fn all() -> [Provider; 2] {
        [Provider::Google, Provider::Facebook]
    }
}

/// Error for an unrecognized provider name (e.g. from a route path)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "facebook" => Ok(Provider::Facebook),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}
