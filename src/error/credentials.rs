//! Registry credential errors

use super::GenconfigError;

/// Wraps any failure raised while provisioning registry credentials
pub fn provisioning_failed(source: GenconfigError) -> GenconfigError {
    GenconfigError::Credential {
        source: Box::new(source),
    }
}

/// Creates an authorization error for the registry token service
pub fn authorization_failed(message: impl Into<String>) -> GenconfigError {
    GenconfigError::Authorization {
        message: message.into(),
    }
}
