//! Configuration document errors

use super::GenconfigError;

/// Creates a parse error for an on-disk configuration document
pub fn parse_failed(path: impl Into<String>, reason: impl ToString) -> GenconfigError {
    GenconfigError::Parse {
        source_name: path.into(),
        reason: reason.to_string(),
    }
}
