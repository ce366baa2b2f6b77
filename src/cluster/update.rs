//! Per-server update descriptors and leader election changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::server::Server;
use crate::loc::Locator;

/// A server together with the runtime update computed for it.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServer {
    pub server: Server,
    pub runtime: RuntimePackage,
}

impl UpdateServer {
    pub fn hostname(&self) -> &str {
        &self.server.hostname
    }
}

/// Runtime package state of a server.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuntimePackage {
    /// Currently installed runtime package.
    pub installed: Locator,

    /// New secrets package, when secrets are rotated as part of the update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets_package: Option<Locator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<RuntimeUpdate>,
}

/// Pending runtime update.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeUpdate {
    pub package: Locator,
    pub config_package: Locator,
}

/// Change to the set of servers eligible to become cluster leader.
///
/// The two sets never share a server.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElectionChange {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enable: Vec<Server>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable: Vec<Server>,
}

impl ElectionChange {
    pub const fn new(enable: Vec<Server>, disable: Vec<Server>) -> Self {
        Self { enable, disable }
    }

    /// Returns true if some server is both enabled and disabled.
    pub fn overlaps(&self) -> bool {
        self.enable
            .iter()
            .any(|e| self.disable.iter().any(|d| d.hostname == e.hostname))
    }
}

/// Servers to resume leader election on.
pub fn enable(updates: &[&UpdateServer]) -> Vec<Server> {
    updates.iter().map(|u| u.server.clone()).collect()
}

/// Servers to stop leader election on.
pub fn disable(updates: &[&UpdateServer]) -> Vec<Server> {
    updates.iter().map(|u| u.server.clone()).collect()
}
