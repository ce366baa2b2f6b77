//! Offline rotator used to preview plans without a package service.

use async_trait::async_trait;
use tracing::debug;

use super::resolver::{
    ConfigPackageRotator, RotateConfigRequest, RotatePackageResponse, RotateSecretsRequest,
};

/// Derives package locators from the server and operation without storing anything.
///
/// Only dry-run requests are accepted.
#[derive(Clone, Debug, Default)]
pub struct OfflineRotator;

/// Suffix identifying a server's packages: its advertise address without dots.
fn server_suffix(advertise_ip: &str) -> String {
    advertise_ip.replace(['.', ':'], "")
}

#[async_trait]
impl ConfigPackageRotator for OfflineRotator {
    async fn rotate_config(
        &self,
        req: RotateConfigRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse> {
        anyhow::ensure!(req.dry_run, "offline rotator only supports dry-run rotation");

        let name = format!(
            "{}-config-{}{}",
            req.runtime_package.name,
            server_suffix(&req.server.advertise_ip),
            req.key.cluster_name
        );
        let version = format!("{}-{}", req.runtime_package.version, req.key.operation_id);
        debug!("Offline config package for {}: {}", req.server.hostname, name);

        Ok(RotatePackageResponse {
            locator: req.runtime_package.sibling(name, version),
        })
    }

    async fn rotate_secrets(
        &self,
        req: RotateSecretsRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse> {
        anyhow::ensure!(req.dry_run, "offline rotator only supports dry-run rotation");

        let name = format!(
            "{}-{}-secrets",
            req.runtime_package.name,
            server_suffix(&req.server.advertise_ip)
        );
        debug!("Offline secrets package for {}: {}", req.server.hostname, name);

        Ok(RotatePackageResponse {
            locator: req
                .runtime_package
                .sibling(name, req.runtime_package.version.clone()),
        })
    }
}
