//! Rolling update of cluster runtime packages.
//!
//! Updates are resolved first by dry-run rotation of every server's
//! configuration, then turned into the phase tree by [`Builder`].

pub mod builder;
pub mod offline;
pub mod resolver;
pub mod steps;

#[cfg(test)]
pub(crate) mod testutil;

use tracing::info;

pub use builder::Builder;
pub use offline::OfflineRotator;
pub use resolver::{
    ClusterKey, ConfigPackageRotator, OperationKey, RotateConfigRequest, RotatePackageResponse,
    RotateSecretsRequest, runtime_config_updates, runtime_config_updates_with_secrets,
};
pub use steps::{CustomStep, ElectionStep};

use crate::description::ClusterDescription;
use crate::error::PlanError;
use crate::plan::Plan;

/// Resolve updates for every server in the description and build the plan.
///
/// All servers are resolved as one batch, so a rotation failure on any of
/// them fails the whole plan.
pub async fn plan_update(
    desc: &ClusterDescription,
    rotator: &dyn ConfigPackageRotator,
    with_secrets: bool,
) -> Result<Plan, PlanError> {
    let builder = desc.builder()?;
    let masters = desc.masters();
    if masters.is_empty() {
        return Err(PlanError::NoMasters);
    }
    let nodes = desc.nodes();
    info!(
        "Planning rolling update of {} ({} masters, {} nodes)",
        desc.cluster_name,
        masters.len(),
        nodes.len()
    );

    let servers: Vec<_> = masters.iter().chain(&nodes).cloned().collect();
    let key = desc.operation_key();
    let mut updates = if with_secrets {
        runtime_config_updates_with_secrets(&desc.manifest, rotator, &key, &servers).await?
    } else {
        runtime_config_updates(&desc.manifest, rotator, &key, &servers).await?
    };
    let node_updates = updates.split_off(masters.len());

    let root = builder.plan(&updates, &node_updates)?;
    Ok(Plan::new(
        desc.operation_id.clone(),
        desc.cluster_name.clone(),
        root,
    ))
}
