//! Configuration documents written for the RKE2 node
//!
//! This module handles:
//! - The generic [`ConfigDocument`] mapping and its shallow merge
//! - Read-modify-write of documents on disk ([`writer`])
//! - The node `config.yaml` contents ([`node`])
//! - `HelmChartConfig` manifests for add-on components ([`chart`])

pub mod chart;
pub mod document;
pub mod node;
pub mod writer;

pub use chart::HelmChartConfig;
pub use document::ConfigDocument;
pub use node::NodeConfig;
pub use writer::{merge_write, merge_write_nested, write_document};
