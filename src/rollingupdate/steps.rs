//! Single-step phase constructors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::builder::Builder;
use crate::cluster::{ElectionChange, Server, UpdateServer};
use crate::error::PlanError;
use crate::plan::{Executor, Phase, PhaseData};

/// Ids of the fixed steps a custom step may not reuse.
pub const BUILTIN_STEP_IDS: [&str; 9] = [
    "drain",
    "restart",
    "taint",
    "untaint",
    "uncordon",
    "endpoints",
    "stepdown",
    "elect",
    "enable-elections",
];

/// Template for the one-off step run on the bootstrap master.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomStep {
    pub id: String,
    /// `{}` is replaced with the quoted hostname of the target server.
    pub description: String,
    /// Executor label the execution engine knows this step by.
    pub executor: String,
}

impl CustomStep {
    /// The id must be non-empty and distinct from every built-in step.
    pub fn validate(&self) -> Result<(), PlanError> {
        let id = self.id.trim();
        if id.is_empty() || id.contains('/') || BUILTIN_STEP_IDS.contains(&id) {
            return Err(PlanError::ReservedStepId(self.id.clone()));
        }
        Ok(())
    }
}

/// Leader election steps of a master rollout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElectionStep {
    /// Bootstrap master gives up leadership before it is disrupted.
    StepDown,
    /// Bootstrap master takes leadership back once restarted.
    Elect,
    /// A peer master becomes electable again after its update.
    EnableElections,
}

impl ElectionStep {
    pub const fn id(self) -> &'static str {
        match self {
            Self::StepDown => "stepdown",
            Self::Elect => "elect",
            Self::EnableElections => "enable-elections",
        }
    }

    fn describe(self, hostname: &str) -> String {
        match self {
            Self::StepDown => format!("Step down {hostname:?} as Kubernetes leader"),
            Self::Elect => format!("Make node {hostname:?} Kubernetes leader"),
            Self::EnableElections => format!("Enable leader election on node {hostname:?}"),
        }
    }
}

/// Render a caller supplied description template for a server.
pub(crate) fn describe(template: &str, hostname: &str) -> String {
    if template.contains("{}") {
        template.replacen("{}", &format!("{hostname:?}"), 1)
    } else {
        template.to_string()
    }
}

impl Builder {
    /// Restart the runtime container on the server with its updated configuration.
    pub fn restart(&self, update: &UpdateServer) -> Phase {
        Phase::leaf(
            "restart",
            format!("Restart container on node {:?}", update.hostname()),
            Executor::RestartContainer,
            PhaseData::Restart {
                exec_server: update.server.clone(),
                package: self.app.clone(),
                update: vec![update.clone()],
            },
        )
    }

    /// Instantiate the custom step for the server, if one is configured.
    pub fn custom(&self, server: &Server) -> Option<Phase> {
        self.custom_update.as_ref().map(|step| {
            Phase::leaf(
                step.id.clone(),
                describe(&step.description, &server.hostname),
                Executor::Custom(step.executor.clone()),
                PhaseData::Node {
                    server: server.clone(),
                    exec_server: None,
                },
            )
        })
    }
}

/// Evict workloads from the node. Runs on the node itself unless `exec` is given.
pub fn drain(server: &Server, exec: Option<&Server>) -> Phase {
    node_step(
        "drain",
        format!("Drain node {:?}", server.hostname),
        Executor::Drain,
        server,
        Some(exec.unwrap_or(server)),
    )
}

pub fn taint(server: &Server, exec: Option<&Server>) -> Phase {
    node_step(
        "taint",
        format!("Taint node {:?}", server.hostname),
        Executor::Taint,
        server,
        exec,
    )
}

pub fn untaint(server: &Server, exec: Option<&Server>) -> Phase {
    node_step(
        "untaint",
        format!("Remove taint from node {:?}", server.hostname),
        Executor::Untaint,
        server,
        exec,
    )
}

pub fn uncordon(server: &Server, exec: Option<&Server>) -> Phase {
    node_step(
        "uncordon",
        format!("Uncordon node {:?}", server.hostname),
        Executor::Uncordon,
        server,
        exec,
    )
}

/// Wait until the node's service endpoints are healthy.
pub fn endpoints(server: &Server, exec: Option<&Server>) -> Phase {
    node_step(
        "endpoints",
        format!("Wait for endpoints on node {:?}", server.hostname),
        Executor::WaitEndpoints,
        server,
        exec,
    )
}

/// Change leader election state in the cluster.
///
/// `server` is the acting server: the phase runs on it and is described
/// against it.
pub fn leader_election(step: ElectionStep, change: ElectionChange, server: &UpdateServer) -> Phase {
    debug_assert!(!change.overlaps(), "election change enables and disables the same server");
    Phase::leaf(
        step.id(),
        step.describe(server.hostname()),
        Executor::LeaderElection,
        PhaseData::Election {
            server: server.server.clone(),
            change,
        },
    )
}

fn node_step(
    id: &str,
    description: String,
    executor: Executor,
    server: &Server,
    exec: Option<&Server>,
) -> Phase {
    Phase::leaf(
        id,
        description,
        executor,
        PhaseData::Node {
            server: server.clone(),
            exec_server: exec.cloned(),
        },
    )
}
