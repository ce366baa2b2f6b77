//! Phase tree nodes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::executor::Executor;
use crate::cluster::{ElectionChange, Server, UpdateServer};
use crate::loc::Locator;

/// How a child phase is ordered relative to its previous sibling.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Starts only after the previous sibling's whole subtree succeeded.
    Sequential,
    /// No ordering constraint against siblings.
    Parallel,
}

/// A node in the plan tree.
///
/// Phases with an executor are leaves denoting one concrete action. Phases
/// without one only group their children.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// Identifier, unique among siblings.
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PhaseData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildPhase>,
}

/// A child phase and the composition it was added with.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildPhase {
    pub composition: Composition,
    pub phase: Phase,
}

/// Payload of a leaf phase.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum PhaseData {
    /// Cluster-wide runtime configuration update.
    Config {
        package: Locator,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        update: Vec<UpdateServer>,
    },
    /// Runtime container restart on a single server.
    #[serde(rename_all = "camelCase")]
    Restart {
        exec_server: Server,
        package: Locator,
        update: Vec<UpdateServer>,
    },
    /// Action against a single node, optionally run from another server.
    #[serde(rename_all = "camelCase")]
    Node {
        server: Server,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exec_server: Option<Server>,
    },
    /// Leader election change, described against the acting server.
    Election {
        server: Server,
        change: ElectionChange,
    },
}

impl PhaseData {
    /// The server this phase is about.
    pub fn server(&self) -> Option<&Server> {
        match self {
            Self::Config { .. } => None,
            Self::Restart { exec_server, .. } => Some(exec_server),
            Self::Node { server, .. } | Self::Election { server, .. } => Some(server),
        }
    }

    /// The server the phase's command runs on, when set.
    pub fn exec_server(&self) -> Option<&Server> {
        match self {
            Self::Restart { exec_server, .. } => Some(exec_server),
            Self::Node { exec_server, .. } => exec_server.as_ref(),
            Self::Config { .. } | Self::Election { .. } => None,
        }
    }
}

impl Phase {
    /// Create a structural phase.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            executor: None,
            data: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf phase.
    pub fn leaf(
        id: impl Into<String>,
        description: impl Into<String>,
        executor: Executor,
        data: PhaseData,
    ) -> Self {
        Self {
            executor: Some(executor),
            data: Some(data),
            ..Self::new(id, description)
        }
    }

    /// Append phases that each run after the previously added sibling.
    pub fn add_sequential(&mut self, phases: impl IntoIterator<Item = Self>) {
        self.add(Composition::Sequential, phases);
    }

    /// Append phases with no ordering against their siblings.
    pub fn add_parallel(&mut self, phases: impl IntoIterator<Item = Self>) {
        self.add(Composition::Parallel, phases);
    }

    fn add(&mut self, composition: Composition, phases: impl IntoIterator<Item = Self>) {
        self.children.extend(
            phases
                .into_iter()
                .map(|phase| ChildPhase { composition, phase }),
        );
    }

    pub const fn is_leaf(&self) -> bool {
        self.executor.is_some()
    }

    /// Child phases in insertion order.
    pub fn phases(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().map(|c| &c.phase)
    }

    /// Look up a direct child by id.
    pub fn child(&self, id: &str) -> Option<&Self> {
        self.phases().find(|p| p.id == id)
    }

    /// All phases of the subtree in depth-first order, starting with `self`.
    pub fn walk(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in self.phases() {
            out.extend(child.walk());
        }
        out
    }
}
