//! Kubernetes release descriptor model
//!
//! A release descriptor lists components under `status.components`, each with
//! a set of typed assets. Only the fields used for node configuration are
//! modelled; everything else in the document is ignored.
//!
//! ```yaml
//! metadata:
//!   name: kubernetes-1-29-eks-7
//! status:
//!   components:
//!     - name: kubernetes
//!       assets:
//!         - name: pause-image
//!           type: Image
//!           image:
//!             uri: public.ecr.aws/eks-distro/kubernetes/pause:v1.29.0
//!         - name: kubernetes-node-linux-amd64.tar.gz
//!           type: Archive
//!           archive:
//!             uri: https://distro.eks.amazonaws.com/.../kubernetes-node-linux-amd64.tar.gz
//! ```

pub mod fetch;
pub mod image;
pub mod resolve;

use serde::{Deserialize, Serialize};

pub use fetch::ReleaseFetcher;
pub use image::ResolvedImage;

/// Parsed release descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    #[serde(default)]
    pub metadata: ReleaseMetadata,

    #[serde(default)]
    pub status: ReleaseStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseStatus {
    #[serde(default)]
    pub components: Vec<Component>,
}

/// A named release component and its assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A single artifact published by a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,

    #[serde(rename = "type")]
    pub asset_type: AssetType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Locator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Locator>,
}

/// Asset type as published in the descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    Image,
    Archive,
    /// Any type this tool does not consume (e.g. `File`)
    Other(String),
}

impl From<String> for AssetType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Image" => AssetType::Image,
            "Archive" => AssetType::Archive,
            _ => AssetType::Other(value),
        }
    }
}

impl From<AssetType> for String {
    fn from(value: AssetType) -> Self {
        match value {
            AssetType::Image => "Image".to_string(),
            AssetType::Archive => "Archive".to_string(),
            AssetType::Other(other) => other,
        }
    }
}

/// Type-specific asset location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub uri: String,
}

impl ReleaseDescriptor {
    /// Parse a descriptor from YAML text
    pub fn from_yaml(content: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| crate::error::release::parse_failed("release descriptor", e))
    }

    /// Release name for display, if the descriptor carries one
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("<unnamed>")
    }

    /// All assets across all components, in descriptor order
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.status
            .components
            .iter()
            .flat_map(|component| component.assets.iter())
    }

    /// URIs of every image asset, in descriptor order
    pub fn image_uris(&self) -> impl Iterator<Item = &str> {
        self.assets()
            .filter(|asset| asset.asset_type == AssetType::Image)
            .filter_map(|asset| asset.image.as_ref())
            .map(|locator| locator.uri.as_str())
    }
}
