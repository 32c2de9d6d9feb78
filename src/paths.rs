//! Output locations for generated node files
//!
//! Every file is written below `--prefix`, so the same run can target the
//! live root filesystem (`/`) or a staging tree for containerized installs
//! and tests. Paths recorded inside config files never carry the prefix.

use std::path::{Component, Path, PathBuf};

const ETC_DIR: &str = "etc/rancher/rke2";

/// Lexically normalize a path: collapse `.`, `..` and repeated separators
/// without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Place `path` below `prefix`, treating an absolute `path` as prefix-relative
pub fn rebase(prefix: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect();
    normalize(&prefix.join(relative))
}

/// Resolved output locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePaths {
    prefix: PathBuf,
    data_dir: PathBuf,
}

impl NodePaths {
    pub fn new(prefix: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Data directory as seen by the node, without the output prefix
    pub fn node_data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `{prefix}/etc/rancher/rke2`
    pub fn etc_dir(&self) -> PathBuf {
        rebase(&self.prefix, Path::new(ETC_DIR))
    }

    pub fn node_config(&self) -> PathBuf {
        self.etc_dir().join("config.yaml")
    }

    pub fn registries(&self) -> PathBuf {
        self.etc_dir().join("registries.yaml")
    }

    /// `{prefix}/{data-dir}`
    pub fn data_root(&self) -> PathBuf {
        rebase(&self.prefix, &self.data_dir)
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.data_root().join("server/manifests")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.data_root().join("opt/bin")
    }
}
