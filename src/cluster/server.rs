//! Cluster server descriptors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Role of a server in the cluster.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClusterRole {
    /// Control plane node taking part in leader election.
    Master,
    /// Regular worker node.
    Node,
}

impl std::fmt::Display for ClusterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Node => write!(f, "node"),
        }
    }
}

/// A single cluster server.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub hostname: String,
    /// Address the server advertises to its peers.
    pub advertise_ip: String,
    /// Manifest profile the server was installed with.
    pub role: String,
    pub cluster_role: ClusterRole,
}

impl Server {
    pub fn is_master(&self) -> bool {
        self.cluster_role == ClusterRole::Master
    }
}
