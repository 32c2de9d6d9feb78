//! Registry authorization tokens
//!
//! The token service is reached through [`AuthorizationTokenSource`] so the
//! provisioning flow can be exercised without AWS. [`EcrTokenSource`] is the
//! production implementation on top of the AWS SDK.

use aws_sdk_ecr::config::Region;
use aws_sdk_ecr::error::DisplayErrorContext;
use base64::Engine as _;
use base64::engine::general_purpose;
use tokio::runtime::Handle;

use crate::error::{Result, credentials};

/// One authorization record as returned by the token service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRecord {
    /// Registry URL, e.g. `https://111.dkr.ecr.us-east-1.amazonaws.com`
    pub proxy_endpoint: String,
    /// Base64 of `username:password`
    pub authorization_token: String,
}

/// Decoded credential for one registry endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCredential {
    /// Bare registry host, without scheme
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl AuthorizationRecord {
    /// Decode the token and strip the scheme from the endpoint
    pub fn decode(&self) -> Result<RegistryCredential> {
        let endpoint = self
            .proxy_endpoint
            .split_once("//")
            .map_or(self.proxy_endpoint.as_str(), |(_, host)| host)
            .trim_end_matches('/')
            .to_string();

        let decoded = general_purpose::STANDARD
            .decode(self.authorization_token.trim())
            .map_err(|e| {
                credentials::authorization_failed(format!(
                    "invalid authorization token for {endpoint}: {e}"
                ))
            })?;
        let decoded = String::from_utf8(decoded).map_err(|e| {
            credentials::authorization_failed(format!(
                "authorization token for {endpoint} is not UTF-8: {e}"
            ))
        })?;
        let Some((username, password)) = decoded.split_once(':') else {
            return Err(credentials::authorization_failed(format!(
                "authorization token for {endpoint} is not of the form username:password"
            )));
        };

        Ok(RegistryCredential {
            endpoint,
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// A service that issues registry authorization tokens
pub trait AuthorizationTokenSource {
    /// Request tokens for all `registry_ids` in `region` in a single call
    fn authorization_tokens(
        &self,
        region: &str,
        registry_ids: &[String],
    ) -> Result<Vec<AuthorizationRecord>>;
}

/// Amazon ECR `GetAuthorizationToken` via the AWS SDK.
///
/// Credentials come from the SDK's default provider chain (environment,
/// profile, instance metadata). The SDK is async; calls are driven to
/// completion on `runtime` from the blocking caller.
pub struct EcrTokenSource {
    runtime: Handle,
}

impl EcrTokenSource {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl AuthorizationTokenSource for EcrTokenSource {
    fn authorization_tokens(
        &self,
        region: &str,
        registry_ids: &[String],
    ) -> Result<Vec<AuthorizationRecord>> {
        let region = Region::new(region.to_string());
        let registry_ids = registry_ids.to_vec();

        let output = self.runtime.block_on(async move {
            let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            let client = aws_sdk_ecr::Client::new(&sdk_config);

            #[allow(deprecated)]
            let request = client
                .get_authorization_token()
                .set_registry_ids(Some(registry_ids));
            request.send().await
        });

        let output = output.map_err(|e| {
            credentials::authorization_failed(DisplayErrorContext(&e).to_string())
        })?;

        output
            .authorization_data()
            .iter()
            .map(|data| {
                let proxy_endpoint = data.proxy_endpoint().ok_or_else(|| {
                    credentials::authorization_failed("authorization data without proxyEndpoint")
                })?;
                let authorization_token = data.authorization_token().ok_or_else(|| {
                    credentials::authorization_failed(format!(
                        "authorization data for {proxy_endpoint} without authorizationToken"
                    ))
                })?;
                Ok(AuthorizationRecord {
                    proxy_endpoint: proxy_endpoint.to_string(),
                    authorization_token: authorization_token.to_string(),
                })
            })
            .collect()
    }
}
