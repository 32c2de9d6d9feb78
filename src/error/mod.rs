//! Error types and handling for rke2-genconfig
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`release`]: Release descriptor fetching and asset lookup errors
//! - [`archive`]: Archive download and extraction errors
//! - [`credentials`]: Registry credential provisioning errors
//! - [`document`]: Configuration document errors
//! - [`fs`]: File system errors

pub mod archive;
pub mod credentials;
pub mod document;
pub mod fs;
pub mod release;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for configuration generation
#[derive(Error, Diagnostic, Debug)]
pub enum GenconfigError {
    // Network errors
    #[error("Request to {url} failed: {reason}")]
    #[diagnostic(
        code(genconfig::network::request_failed),
        help("Check that the URL is correct and reachable from this node")
    )]
    Network { url: String, reason: String },

    // Document errors
    #[error("Failed to parse {source_name}: {reason}")]
    #[diagnostic(code(genconfig::document::parse_failed))]
    Parse { source_name: String, reason: String },

    // Release errors
    #[error("Unable to find {kind} asset for {name}")]
    #[diagnostic(
        code(genconfig::release::asset_not_found),
        help("Check that the release descriptor lists this asset under status.components")
    )]
    NotFound { kind: String, name: String },

    #[error("Invalid image reference '{reference}': {reason}")]
    #[diagnostic(
        code(genconfig::release::invalid_image),
        help("Image references must be of the form repository:tag")
    )]
    InvalidImageReference { reference: String, reason: String },

    // Archive errors
    #[error("Malformed archive from {url}: {reason}")]
    #[diagnostic(code(genconfig::archive::format))]
    ArchiveFormat { url: String, reason: String },

    // Credential errors
    #[error("Unable to write ECR credentials to registries.yaml: {source}")]
    #[diagnostic(
        code(genconfig::credentials::provisioning_failed),
        help("Check the node's AWS credentials and its permission to call ecr:GetAuthorizationToken")
    )]
    Credential { source: Box<GenconfigError> },

    #[error("Registry authorization failed: {message}")]
    #[diagnostic(code(genconfig::credentials::authorization_failed))]
    Authorization { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(genconfig::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(genconfig::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(genconfig::fs::io_error))]
    IoError {
        message: String,
        source: Option<std::io::Error>,
    },
}

impl From<std::io::Error> for GenconfigError {
    fn from(err: std::io::Error) -> Self {
        GenconfigError::IoError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for GenconfigError {
    fn from(err: serde_yaml::Error) -> Self {
        GenconfigError::Parse {
            source_name: "YAML document".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, GenconfigError>;
