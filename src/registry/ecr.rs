//! ECR registry host discovery and grouping

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::release::{ReleaseDescriptor, ResolvedImage};

/// Substring that marks a registry host as an ECR registry candidate
const ECR_MARKER: &str = ".ecr.";

fn ecr_host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^(?P<registry>.+)\.dkr\.ecr\.(?P<region>.+)\.amazonaws\.com").unwrap()
    })
}

/// A private ECR registry: account registry ID and region
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EcrRegistry {
    pub registry_id: String,
    pub region: String,
}

impl EcrRegistry {
    /// Parse `<registry-id>.dkr.ecr.<region>.amazonaws.com`
    pub fn parse(host: &str) -> Option<Self> {
        let captures = ecr_host_pattern().captures(host)?;
        Some(Self {
            registry_id: captures["registry"].to_string(),
            region: captures["region"].to_string(),
        })
    }
}

/// Distinct registry hosts of every image asset that look like ECR
pub fn ecr_hosts(descriptor: &ReleaseDescriptor) -> BTreeSet<&str> {
    descriptor
        .image_uris()
        .map(ResolvedImage::registry_host)
        .filter(|host| host.contains(ECR_MARKER))
        .collect()
}

/// Group the registry IDs of matching hosts by region.
///
/// Hosts that carry the ECR marker but do not match the private registry
/// pattern (e.g. `public.ecr.aws`) are skipped.
pub fn group_by_region<'a>(hosts: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, Vec<String>> {
    let mut regions: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for host in hosts {
        match EcrRegistry::parse(host) {
            Some(registry) => regions
                .entry(registry.region)
                .or_default()
                .push(registry.registry_id),
            None => tracing::debug!("Ignoring non-private ECR host {}", host),
        }
    }
    regions
}
