//! Form payloads

use serde::Deserialize;

/// Submission form (POST /submit)
///
/// The field is named `secret`, matching the submit view's input.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitForm {
    pub secret: String,
}
