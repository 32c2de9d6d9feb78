//! RKE2 node `config.yaml` contents

use std::path::Path;

use super::ConfigDocument;
use crate::paths::normalize;

/// Values this tool owns in the node config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub kubelet_path: String,
    pub data_dir: String,
    /// `(image name, image reference)` pairs, written as `<name>-image` keys
    pub images: Vec<(String, String)>,
}

impl NodeConfig {
    /// Node config for `data_dir` as seen from the node (without any output prefix)
    pub fn new(data_dir: &Path) -> Self {
        Self {
            kubelet_path: normalize(&data_dir.join("opt/bin/kubelet"))
                .display()
                .to_string(),
            data_dir: normalize(data_dir).display().to_string(),
            images: Vec::new(),
        }
    }

    pub fn set_image(&mut self, name: &str, reference: &str) {
        self.images.push((name.to_string(), reference.to_string()));
    }

    /// Fields to merge into `config.yaml`
    pub fn to_document(&self) -> ConfigDocument {
        let mut document = ConfigDocument::new();
        document.insert("kubelet-path", self.kubelet_path.as_str());
        document.insert("data-dir", self.data_dir.as_str());
        for (name, reference) in &self.images {
            document.insert(format!("{name}-image"), reference.as_str());
        }
        document
    }
}
