//! Cluster description file: the input of a plan preview.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cluster::{Manifest, Server};
use crate::error::PlanError;
use crate::loc::Locator;
use crate::rollingupdate::{Builder, CustomStep, OperationKey};

/// Everything needed to plan a rolling update of one cluster.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    #[serde(default = "default_account_id")]
    pub account_id: String,
    pub operation_id: String,
    pub cluster_name: String,
    /// Cluster application package.
    pub app: Locator,
    pub manifest: Manifest,
    /// Servers in rollout order. The first master is the bootstrap master.
    pub servers: Vec<Server>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_step: Option<CustomStep>,
}

fn default_account_id() -> String {
    "system".to_string()
}

impl ClusterDescription {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse cluster description")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cluster description {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn operation_key(&self) -> OperationKey {
        OperationKey {
            account_id: self.account_id.clone(),
            cluster_name: self.cluster_name.clone(),
            operation_id: self.operation_id.clone(),
        }
    }

    pub fn masters(&self) -> Vec<Server> {
        self.servers.iter().filter(|s| s.is_master()).cloned().collect()
    }

    pub fn nodes(&self) -> Vec<Server> {
        self.servers.iter().filter(|s| !s.is_master()).cloned().collect()
    }

    /// Plan builder for this cluster's application and custom step.
    pub fn builder(&self) -> Result<Builder, PlanError> {
        let builder = Builder::new(self.app.clone());
        match &self.custom_step {
            Some(step) => builder.with_custom_update(step.clone()),
            None => Ok(builder),
        }
    }
}
