use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use rollplan::PlanError;
use rollplan::description::ClusterDescription;
use rollplan::plan::PhaseData;
use rollplan::rollingupdate::{
    self, ConfigPackageRotator, OfflineRotator, RotateConfigRequest, RotatePackageResponse,
    RotateSecretsRequest,
};
use tempfile::NamedTempFile;

fn fixture() -> ClusterDescription {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("cluster.yaml");
    ClusterDescription::load(&path).expect("Failed to load fixture")
}

/// Rotator that refuses to rotate anything for one host.
struct BrokenRotator(&'static str);

#[async_trait]
impl ConfigPackageRotator for BrokenRotator {
    async fn rotate_config(
        &self,
        req: RotateConfigRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse> {
        if req.server.hostname == self.0 {
            anyhow::bail!("package service unavailable");
        }
        OfflineRotator.rotate_config(req).await
    }

    async fn rotate_secrets(
        &self,
        req: RotateSecretsRequest<'_>,
    ) -> anyhow::Result<RotatePackageResponse> {
        OfflineRotator.rotate_secrets(req).await
    }
}

#[tokio::test]
async fn test_plan_update_from_fixture() {
    let desc = fixture();
    let plan = rollingupdate::plan_update(&desc, &OfflineRotator, false)
        .await
        .unwrap();

    assert_eq!(plan.operation_id, "7f3c2a");
    assert_eq!(plan.cluster_name, "example.com");

    let masters = plan.root.child("masters").unwrap();
    let hosts: Vec<_> = masters.phases().map(|p| p.id.as_str()).collect();
    assert_eq!(hosts, ["master-a", "master-b", "master-c"]);

    let nodes = plan.root.child("nodes").unwrap();
    let hosts: Vec<_> = nodes.phases().map(|p| p.id.as_str()).collect();
    assert_eq!(hosts, ["worker-x", "worker-y"]);

    let drain = nodes.child("worker-x").unwrap().child("drain").unwrap();
    let exec = drain.data.as_ref().unwrap().exec_server().unwrap();
    assert_eq!(exec.hostname, "master-a");
}

#[tokio::test]
async fn test_plan_update_resolves_profile_runtime() {
    let desc = fixture();
    let plan = rollingupdate::plan_update(&desc, &OfflineRotator, false)
        .await
        .unwrap();

    let restart = plan
        .root
        .child("nodes")
        .and_then(|n| n.child("worker-y"))
        .and_then(|n| n.child("restart"))
        .unwrap();
    let Some(PhaseData::Restart { update, .. }) = &restart.data else {
        panic!("restart phase without restart payload");
    };
    assert_eq!(update.len(), 1);
    let runtime = &update[0].runtime;
    assert_eq!(runtime.installed.name, "planet-gpu");
    assert!(runtime.secrets_package.is_none());
    assert_eq!(
        runtime.update.as_ref().unwrap().config_package.to_string(),
        "gravitational.io/planet-gpu-config-1000012example.com:7.0.35-7f3c2a"
    );
}

#[tokio::test]
async fn test_plan_update_with_secrets() {
    let desc = fixture();
    let plan = rollingupdate::plan_update(&desc, &OfflineRotator, true)
        .await
        .unwrap();

    let config = plan.root.child("update-config").unwrap();
    let Some(PhaseData::Config { update, .. }) = &config.data else {
        panic!("config phase without config payload");
    };
    assert_eq!(update.len(), 5);
    assert!(update.iter().all(|u| u.runtime.secrets_package.is_some()));
}

#[tokio::test]
async fn test_plan_update_fails_on_any_rotation_error() {
    let desc = fixture();
    let err = rollingupdate::plan_update(&desc, &BrokenRotator("worker-y"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::Rotation { ref hostname, .. } if hostname == "worker-y"));
}

#[tokio::test]
async fn test_plan_update_requires_masters() {
    let mut desc = fixture();
    desc.servers.retain(|s| !s.is_master());
    let err = rollingupdate::plan_update(&desc, &OfflineRotator, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NoMasters));
}

#[tokio::test]
async fn test_plan_update_rejects_repeated_hostname() {
    let mut desc = fixture();
    let mut dup = desc.servers[2].clone();
    dup.advertise_ip = "10.0.0.20".to_string();
    desc.servers.push(dup);
    let err = rollingupdate::plan_update(&desc, &OfflineRotator, false)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::DuplicateServer(ref h) if h == "master-b"));
}

#[tokio::test]
async fn test_plan_update_without_workers() {
    let mut desc = fixture();
    desc.servers.retain(|s| s.is_master());
    let plan = rollingupdate::plan_update(&desc, &OfflineRotator, false)
        .await
        .unwrap();
    assert!(plan.root.child("nodes").is_none());
}

#[test]
fn test_load_description_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r"
operationId: op-2
clusterName: small.example.com
app: gravitational.io/telekube:7.0.1
manifest:
  systemRuntime: gravitational.io/planet:7.0.36
  profiles:
    master: {{}}
servers:
  - hostname: solo
    advertiseIp: 192.168.1.10
    role: master
    clusterRole: master
"
    )
    .unwrap();

    let desc = ClusterDescription::load(file.path()).unwrap();
    assert_eq!(desc.cluster_name, "small.example.com");
    assert_eq!(desc.masters().len(), 1);
    assert!(desc.nodes().is_empty());
}
