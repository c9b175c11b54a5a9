//! Identity ID
//!
//! The typed identity ID lives in the kernel so the content domain can
//! reference owners without depending on this crate's entities.

pub use kernel::id::IdentityId;
