//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// Default RKE2 data directory
pub const DEFAULT_DATA_DIR: &str = "/var/lib/rancher/rke2";

/// Node binary archive published by the release
pub const DEFAULT_ARCHIVE: &str = "kubernetes-node-linux-amd64.tar.gz";

/// rke2-genconfig - RKE2 node configuration generator
///
/// Configure an RKE2 node to run the Kubernetes build described by a release descriptor.
#[derive(Parser, Debug)]
#[command(
    name = "rke2-genconfig",
    author,
    version,
    max_term_width = 120,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Generate RKE2 node configuration from a Kubernetes release descriptor",
    long_about = "Downloads a Kubernetes release descriptor, points RKE2 at the release's \
                  container images, extracts the node binaries, and provisions pull \
                  credentials for any private Amazon ECR registries the images live in.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rke2-genconfig --release-url https://distro.eks.amazonaws.com/kubernetes-1-29/kubernetes-1-29-eks-7.yaml\n    \
                  rke2-genconfig --release-url https://example.com/release.yaml --prefix /mnt/image"
)]
pub struct Cli {
    /// URL to a Kubernetes release YAML
    #[arg(long, env = "RKE2_RELEASE_URL", value_name = "URL")]
    pub release_url: String,

    /// RKE2 data directory
    #[arg(long, env = "RKE2_DATA_DIR", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Prefix for output files created by this tool
    #[arg(long, env = "RKE2_GENCONFIG_PREFIX", value_name = "DIR", default_value = "/")]
    pub prefix: PathBuf,

    /// Name of the node binary archive asset in the release
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ARCHIVE)]
    pub archive: String,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
