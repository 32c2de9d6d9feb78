//! Container image reference splitting

use std::fmt;

use crate::error::{Result, release};

/// An image reference split into repository and tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub repository: String,
    pub tag: String,
}

impl ResolvedImage {
    /// Split a `repository:tag` reference.
    ///
    /// The tag separator is the last `:` after the last `/`, so a registry
    /// port (`registry.local:5000/pause:3.9`) stays part of the repository.
    pub fn parse(reference: &str) -> Result<Self> {
        let name_start = reference.rfind('/').map_or(0, |idx| idx + 1);
        let Some(offset) = reference[name_start..].rfind(':') else {
            return Err(release::invalid_image(reference, "missing tag"));
        };
        let split = name_start + offset;

        let repository = &reference[..split];
        let tag = &reference[split + 1..];
        if repository.is_empty() {
            return Err(release::invalid_image(reference, "missing repository"));
        }
        if tag.is_empty() {
            return Err(release::invalid_image(reference, "empty tag"));
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Registry host of the repository (text before the first `/`)
    pub fn registry_host(reference: &str) -> &str {
        reference.split('/').next().unwrap_or(reference)
    }
}

impl fmt::Display for ResolvedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
