//! Rolling update plan builder.
//!
//! Masters are updated strictly one at a time. Leadership is parked on the
//! bootstrap master (the first in the list) for the duration of the rollout and
//! handed back to each peer right after that peer finishes its own update.

use std::collections::HashSet;

use tracing::{debug, info};

use super::steps::{
    CustomStep, ElectionStep, describe, drain, endpoints, leader_election, taint, uncordon, untaint,
};
use crate::cluster::update::{disable, enable};
use crate::cluster::{ElectionChange, Server, UpdateServer};
use crate::error::PlanError;
use crate::loc::Locator;
use crate::plan::{Executor, Phase, PhaseData};

/// Builds rolling update phases.
///
/// Holds no state besides its configuration, so one builder can be reused
/// for any number of plans.
#[derive(Clone, Debug)]
pub struct Builder {
    /// Cluster application package shared by config and restart steps.
    pub app: Locator,
    /// Optional step run once, on the bootstrap master only.
    pub custom_update: Option<CustomStep>,
}

impl Builder {
    pub const fn new(app: Locator) -> Self {
        Self {
            app,
            custom_update: None,
        }
    }

    /// Set the step run once on the bootstrap master.
    ///
    /// Fails when the step id is empty or reuses a built-in step id.
    pub fn with_custom_update(mut self, step: CustomStep) -> Result<Self, PlanError> {
        step.validate()?;
        self.custom_update = Some(step);
        Ok(self)
    }

    /// Phase updating the runtime configuration of all servers in one step.
    pub fn config(&self, root_text: &str, servers: &[UpdateServer]) -> Phase {
        Phase::leaf(
            "update-config",
            root_text,
            Executor::UpdateConfig,
            PhaseData::Config {
                package: self.app.clone(),
                update: servers.to_vec(),
            },
        )
    }

    /// Phase executing a rolling update of the master servers.
    ///
    /// The first server is the bootstrap master.
    pub fn masters(
        &self,
        servers: &[UpdateServer],
        root_text: &str,
        node_text: &str,
    ) -> Result<Phase, PlanError> {
        let (first, others) = servers
            .split_first()
            .ok_or(PlanError::EmptyServerList("masters"))?;
        ensure_unique(servers)?;
        debug!(
            "Building masters phase: bootstrap master {}, {} peers",
            first.hostname(),
            others.len()
        );

        let mut root = Phase::new("masters", root_text);

        let mut node = Phase::new(first.hostname(), describe(node_text, first.hostname()));
        if !others.is_empty() {
            node.add_sequential([leader_election(
                ElectionStep::StepDown,
                ElectionChange::new(enable(&[]), disable(&[first])),
                first,
            )]);
        }
        node.add_sequential(self.first_master_steps(first, others));
        root.add_sequential([node]);

        for server in others {
            let mut node = Phase::new(server.hostname(), describe(node_text, server.hostname()));
            node.add_sequential(self.common(server, None));
            node.add_sequential([leader_election(
                ElectionStep::EnableElections,
                ElectionChange::new(enable(&[server]), disable(&[])),
                server,
            )]);
            root.add_sequential([node]);
        }

        Ok(root)
    }

    /// Phase executing a rolling update of regular servers.
    ///
    /// Every step against a worker runs from `master`.
    pub fn nodes(
        &self,
        servers: &[UpdateServer],
        master: &Server,
        root_text: &str,
        node_text: &str,
    ) -> Result<Phase, PlanError> {
        if servers.is_empty() {
            return Err(PlanError::EmptyServerList("nodes"));
        }
        ensure_unique(servers)?;
        debug!(
            "Building nodes phase: {} nodes via master {}",
            servers.len(),
            master.hostname
        );

        let mut root = Phase::new("nodes", root_text);
        for server in servers {
            let mut node = Phase::new(server.hostname(), describe(node_text, server.hostname()));
            node.add_sequential(self.common(server, Some(master)));
            root.add_sequential([node]);
        }
        Ok(root)
    }

    /// Complete rolling update: configuration, then masters, then workers.
    ///
    /// Workers are driven from the bootstrap master.
    pub fn plan(
        &self,
        masters: &[UpdateServer],
        nodes: &[UpdateServer],
    ) -> Result<Phase, PlanError> {
        let bootstrap = masters
            .first()
            .ok_or(PlanError::EmptyServerList("masters"))?;

        let all: Vec<UpdateServer> = masters.iter().chain(nodes).cloned().collect();
        ensure_unique(&all)?;
        let mut root = Phase::new("update", "Rolling update of the cluster runtime");
        root.add_sequential([
            self.config("Update runtime configuration", &all),
            self.masters(masters, "Update master nodes", "Update runtime on master node {}")?,
        ]);
        if !nodes.is_empty() {
            root.add_sequential([self.nodes(
                nodes,
                &bootstrap.server,
                "Update regular nodes",
                "Update runtime on node {}",
            )?]);
        }

        info!(
            "Built rolling update plan: {} masters, {} nodes",
            masters.len(),
            nodes.len()
        );
        Ok(root)
    }

    fn first_master_steps(&self, server: &UpdateServer, others: &[UpdateServer]) -> Vec<Phase> {
        let target = &server.server;
        let mut phases = vec![drain(target, None), self.restart(server)];
        if !others.is_empty() {
            let others: Vec<&UpdateServer> = others.iter().collect();
            phases.push(leader_election(
                ElectionStep::Elect,
                ElectionChange::new(enable(&[server]), disable(&others)),
                server,
            ));
        }
        phases.extend(self.custom(target));
        phases.extend([
            taint(target, None),
            uncordon(target, None),
            endpoints(target, None),
            untaint(target, None),
        ]);
        phases
    }

    /// The fixed per-node sequence: drain, restart, taint, uncordon, endpoints, untaint.
    fn common(&self, server: &UpdateServer, master: Option<&Server>) -> Vec<Phase> {
        let target = &server.server;
        vec![
            drain(target, master),
            self.restart(server),
            taint(target, master),
            uncordon(target, master),
            endpoints(target, master),
            untaint(target, master),
        ]
    }
}

/// Every server may take part in a rollout once.
fn ensure_unique(servers: &[UpdateServer]) -> Result<(), PlanError> {
    let mut seen = HashSet::new();
    match servers.iter().find(|s| !seen.insert(s.hostname())) {
        Some(dup) => Err(PlanError::DuplicateServer(dup.hostname().to_string())),
        None => Ok(()),
    }
}
