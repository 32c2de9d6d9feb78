//! Release descriptor errors

use super::GenconfigError;

/// Creates a network error for a failed request
pub fn network(url: impl Into<String>, reason: impl ToString) -> GenconfigError {
    GenconfigError::Network {
        url: url.into(),
        reason: reason.to_string(),
    }
}

/// Creates a parse error for a structured document
pub fn parse_failed(source_name: impl Into<String>, reason: impl ToString) -> GenconfigError {
    GenconfigError::Parse {
        source_name: source_name.into(),
        reason: reason.to_string(),
    }
}

/// Creates an asset not found error
pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> GenconfigError {
    GenconfigError::NotFound {
        kind: kind.into(),
        name: name.into(),
    }
}

/// Creates an invalid image reference error
pub fn invalid_image(reference: impl Into<String>, reason: impl Into<String>) -> GenconfigError {
    GenconfigError::InvalidImageReference {
        reference: reference.into(),
        reason: reason.into(),
    }
}
