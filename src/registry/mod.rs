//! Registry credential provisioning for private ECR registries
//!
//! Images in the release may live in private ECR registries that the node's
//! container runtime cannot pull from anonymously. For every such registry
//! this module fetches a short-lived token and records it in RKE2's
//! `registries.yaml` under `configs.<endpoint>.auth`.

pub mod ecr;
pub mod token;

use std::path::Path;

use serde::Serialize;

use crate::config::{ConfigDocument, merge_write_nested};
use crate::error::{Result, credentials};
use crate::release::ReleaseDescriptor;

pub use token::{AuthorizationTokenSource, EcrTokenSource, RegistryCredential};

const CONFIGS_KEY: &str = "configs";

#[derive(Debug, Serialize)]
struct RegistryConfig<'a> {
    auth: RegistryAuth<'a>,
}

#[derive(Debug, Serialize)]
struct RegistryAuth<'a> {
    username: &'a str,
    password: &'a str,
}

/// Fetch ECR credentials for the release's registries and merge them into
/// the credentials document at `output_path`.
///
/// Returns the provisioned credentials; an empty result means no private ECR
/// registry was referenced and the file was not touched. Any failure is
/// wrapped as a credential provisioning error.
pub fn provision_credentials(
    descriptor: &ReleaseDescriptor,
    token_source: &dyn AuthorizationTokenSource,
    output_path: &Path,
) -> Result<Vec<RegistryCredential>> {
    provision(descriptor, token_source, output_path).map_err(credentials::provisioning_failed)
}

fn provision(
    descriptor: &ReleaseDescriptor,
    token_source: &dyn AuthorizationTokenSource,
    output_path: &Path,
) -> Result<Vec<RegistryCredential>> {
    let regions = ecr::group_by_region(ecr::ecr_hosts(descriptor));
    if regions.is_empty() {
        tracing::debug!("No private ECR registries referenced by release");
        return Ok(Vec::new());
    }

    let mut provisioned = Vec::new();
    for (region, registry_ids) in &regions {
        tracing::info!("Getting auth tokens for {:?} in {}", registry_ids, region);
        for record in token_source.authorization_tokens(region, registry_ids)? {
            provisioned.push(record.decode()?);
        }
    }

    let mut configs = ConfigDocument::new();
    for credential in &provisioned {
        let entry = RegistryConfig {
            auth: RegistryAuth {
                username: &credential.username,
                password: &credential.password,
            },
        };
        configs.insert(credential.endpoint.as_str(), serde_yaml::to_value(entry)?);
    }

    tracing::info!("Writing credentials to {}", output_path.display());
    merge_write_nested(output_path, CONFIGS_KEY, configs)?;
    Ok(provisioned)
}
