//! Runtime configuration and secrets updates computed by dry-run rotation.
//!
//! Resolution is all-or-nothing: a failure for any server fails the whole
//! batch and no partial result is returned.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::{Manifest, RuntimePackage, RuntimeUpdate, Server, UpdateServer};
use crate::error::{PlanError, RotationStage};
use crate::loc::Locator;

/// Identifies the cluster operation updates are computed for.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationKey {
    pub account_id: String,
    pub cluster_name: String,
    pub operation_id: String,
}

/// Identifies a cluster.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterKey {
    pub account_id: String,
    pub cluster_name: String,
}

impl OperationKey {
    pub fn cluster_key(&self) -> ClusterKey {
        ClusterKey {
            account_id: self.account_id.clone(),
            cluster_name: self.cluster_name.clone(),
        }
    }
}

/// Request to generate a new runtime configuration package for a server.
#[derive(Clone, Copy, Debug)]
pub struct RotateConfigRequest<'a> {
    pub key: &'a OperationKey,
    pub server: &'a Server,
    pub manifest: &'a Manifest,
    pub runtime_package: &'a Locator,
    /// Compute the package without persisting it.
    pub dry_run: bool,
}

/// Request to generate a new secrets package for a server.
#[derive(Clone, Copy, Debug)]
pub struct RotateSecretsRequest<'a> {
    pub key: &'a ClusterKey,
    pub server: &'a Server,
    pub runtime_package: &'a Locator,
    /// Compute the package without persisting it.
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotatePackageResponse {
    pub locator: Locator,
}

/// Package rotation collaborator.
///
/// Implementations must not change any state when `dry_run` is set.
#[async_trait]
pub trait ConfigPackageRotator: Send + Sync {
    async fn rotate_config(
        &self,
        req: RotateConfigRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse>;

    async fn rotate_secrets(
        &self,
        req: RotateSecretsRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse>;
}

/// Compute runtime configuration updates for the servers, in input order.
pub async fn runtime_config_updates(
    manifest: &Manifest,
    rotator: &dyn ConfigPackageRotator,
    key: &OperationKey,
    servers: &[Server],
) -> Result<Vec<UpdateServer>, PlanError> {
    info!(
        "Resolving runtime config updates for {} servers",
        servers.len()
    );
    try_join_all(
        servers
            .iter()
            .map(|server| resolve_server(manifest, rotator, key, server, false)),
    )
    .await
}

/// Compute runtime configuration updates for the servers, including new
/// secrets packages.
pub async fn runtime_config_updates_with_secrets(
    manifest: &Manifest,
    rotator: &dyn ConfigPackageRotator,
    key: &OperationKey,
    servers: &[Server],
) -> Result<Vec<UpdateServer>, PlanError> {
    info!(
        "Resolving runtime config and secrets updates for {} servers",
        servers.len()
    );
    try_join_all(
        servers
            .iter()
            .map(|server| resolve_server(manifest, rotator, key, server, true)),
    )
    .await
}

async fn resolve_server(
    manifest: &Manifest,
    rotator: &dyn ConfigPackageRotator,
    key: &OperationKey,
    server: &Server,
    with_secrets: bool,
) -> Result<UpdateServer, PlanError> {
    let runtime_package = manifest.runtime_package_for_role(&server.role)?;
    let rotation_error = |stage| {
        move |source: anyhow::Error| PlanError::Rotation {
            hostname: server.hostname.clone(),
            stage,
            source: source.into(),
        }
    };

    let secrets_package = if with_secrets {
        let cluster_key = key.cluster_key();
        let secrets = rotator
            .rotate_secrets(RotateSecretsRequest {
                key: &cluster_key,
                server,
                runtime_package,
                dry_run: true,
            })
            .await
            .map_err(rotation_error(RotationStage::Secrets))?;
        Some(secrets.locator)
    } else {
        None
    };

    let config = rotator
        .rotate_config(RotateConfigRequest {
            key,
            server,
            manifest,
            runtime_package,
            dry_run: true,
        })
        .await
        .map_err(rotation_error(RotationStage::Config))?;

    debug!(
        "Resolved update for {}: config package {}",
        server.hostname, config.locator
    );

    Ok(UpdateServer {
        server: server.clone(),
        runtime: RuntimePackage {
            installed: runtime_package.clone(),
            secrets_package,
            update: Some(RuntimeUpdate {
                package: runtime_package.clone(),
                config_package: config.locator,
            }),
        },
    })
}
