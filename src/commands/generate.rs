//! Node configuration generation
//!
//! Runs every step against one release descriptor, strictly in order:
//! 1. Fetch the release descriptor
//! 2. Provision private ECR credentials into `registries.yaml`
//! 3. Resolve core component images
//! 4. Write `HelmChartConfig` image overrides for packaged add-ons
//! 5. Extract node executables from the release archive
//! 6. Merge the node `config.yaml`
//!
//! Files written by earlier steps stay on disk when a later step fails.

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::archive;
use crate::config::{self, HelmChartConfig, NodeConfig};
use crate::error::Result;
use crate::http;
use crate::paths::NodePaths;
use crate::registry::{self, AuthorizationTokenSource};
use crate::release::resolve::{resolve_archive, resolve_image};
use crate::release::{ReleaseDescriptor, ReleaseFetcher, ResolvedImage};

/// Images RKE2 runs as static pods, configured through `<name>-image` keys
pub const CORE_IMAGES: &[&str] = &[
    "kube-apiserver",
    "kube-controller-manager",
    "kube-scheduler",
    "pause",
    "etcd",
];

/// Packaged add-on charts whose image is overridden with a `HelmChartConfig`
pub const CHART_COMPONENTS: &[&str] = &["kube-proxy", "coredns", "metrics-server"];

/// Inputs for one generation run
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub release_url: String,
    pub data_dir: PathBuf,
    pub prefix: PathBuf,
    pub archive: String,
}

impl From<&crate::cli::Cli> for GenerateArgs {
    fn from(cli: &crate::cli::Cli) -> Self {
        Self {
            release_url: cli.release_url.clone(),
            data_dir: cli.data_dir.clone(),
            prefix: cli.prefix.clone(),
            archive: cli.archive.clone(),
        }
    }
}

/// What a run wrote
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub release_name: String,
    pub registry_endpoints: Vec<String>,
    pub chart_configs: Vec<PathBuf>,
    pub executables: Vec<PathBuf>,
    pub node_config: PathBuf,
}

/// Run generation with `token_source` serving registry tokens
pub fn run(args: &GenerateArgs, token_source: &dyn AuthorizationTokenSource) -> Result<GenerateReport> {
    let client = http::client()?;
    let paths = NodePaths::new(&args.prefix, &args.data_dir);

    let release = ReleaseFetcher::new(&client).fetch(&args.release_url)?;
    let mut report = GenerateReport {
        release_name: release.name().to_string(),
        ..GenerateReport::default()
    };

    report.registry_endpoints =
        registry::provision_credentials(&release, token_source, &paths.registries())?
            .into_iter()
            .map(|credential| credential.endpoint)
            .collect();

    let mut node = NodeConfig::new(paths.node_data_dir());
    for name in CORE_IMAGES {
        node.set_image(name, resolve_image(&release, name)?);
    }

    report.chart_configs = write_chart_configs(&release, &paths.manifests_dir())?;
    report.executables = extract_archive(&client, &release, &args.archive, &paths.bin_dir())?;

    report.node_config = paths.node_config();
    config::merge_write(&report.node_config, node.to_document())?;

    Ok(report)
}

fn write_chart_configs(release: &ReleaseDescriptor, manifests_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for component in CHART_COMPONENTS {
        let image = ResolvedImage::parse(resolve_image(release, component)?)?;
        let chart = HelmChartConfig::image_override(component, &image)?;

        let path = manifests_dir.join(chart.file_name());
        tracing::info!("Writing HelmChartConfig to {}", path.display());
        config::write_document(&path, &chart)?;
        written.push(path);
    }
    Ok(written)
}

fn extract_archive(
    client: &Client,
    release: &ReleaseDescriptor,
    archive_name: &str,
    bin_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let archive_url = resolve_archive(release, archive_name)?;
    archive::extract_executables(client, archive_url, bin_dir)
}
