use serde::{Deserialize, Serialize};

/// Body of POST /register. Every field is optional at this layer; presence
/// and non-emptiness are checked by the storage schema, so a hole in the
/// payload surfaces as the generic persistence failure rather than an
/// extractor rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Submitted by the form, ignored by the service.
    pub confirm_password: Option<String>,
}

/// `{message}` body shared by the confirmation and error replies.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
