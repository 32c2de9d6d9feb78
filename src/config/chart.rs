//! `HelmChartConfig` overrides for packaged add-on charts
//!
//! RKE2 applies every manifest in `server/manifests`; a `HelmChartConfig`
//! named after a bundled chart overrides that chart's values. Only the image
//! repository and tag are overridden.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::release::ResolvedImage;

const API_VERSION: &str = "helm.cattle.io/v1";
const KIND: &str = "HelmChartConfig";
const NAMESPACE: &str = "kube-system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: ChartMetadata,
    pub spec: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Chart values as an embedded YAML document
    pub values_content: String,
}

#[derive(Debug, Serialize)]
struct ImageValues<'a> {
    image: ImageOverride<'a>,
}

#[derive(Debug, Serialize)]
struct ImageOverride<'a> {
    repository: &'a str,
    tag: &'a str,
}

impl HelmChartConfig {
    /// Image override for the bundled `rke2-<component>` chart
    pub fn image_override(component: &str, image: &ResolvedImage) -> Result<Self> {
        let values = ImageValues {
            image: ImageOverride {
                repository: &image.repository,
                tag: &image.tag,
            },
        };

        Ok(Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ChartMetadata {
                name: chart_name(component),
                namespace: NAMESPACE.to_string(),
            },
            spec: ChartSpec {
                values_content: serde_yaml::to_string(&values)?,
            },
        })
    }

    /// File name of the manifest for this chart
    pub fn file_name(&self) -> String {
        format!("{}-config.yaml", self.metadata.name)
    }
}

fn chart_name(component: &str) -> String {
    format!("rke2-{component}")
}
