//! Archive errors

use super::GenconfigError;

/// Creates an archive format error
pub fn format(url: impl Into<String>, reason: impl ToString) -> GenconfigError {
    GenconfigError::ArchiveFormat {
        url: url.into(),
        reason: reason.to_string(),
    }
}
