//! Flattened view of a phase tree with absolute ids and explicit dependencies.

use serde::Serialize;

use super::executor::Executor;
use super::phase::{Composition, Phase};

/// One phase of a flattened plan.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlatPhase {
    /// Absolute path, e.g. `/masters/node-1/drain`.
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    /// Absolute ids of phases that must complete first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

impl Phase {
    /// Flatten the tree in depth-first order.
    ///
    /// A sequentially added child requires its previous sibling; parallel
    /// children require nothing.
    pub fn flatten(&self) -> Vec<FlatPhase> {
        let mut out = Vec::new();
        flatten_into(self, "", Vec::new(), &mut out);
        out
    }
}

fn flatten_into(phase: &Phase, parent: &str, requires: Vec<String>, out: &mut Vec<FlatPhase>) {
    let id = format!("{parent}/{}", phase.id);
    out.push(FlatPhase {
        id: id.clone(),
        description: phase.description.clone(),
        executor: phase.executor.clone(),
        requires,
    });

    let mut previous: Option<String> = None;
    for child in &phase.children {
        let requires = match (child.composition, &previous) {
            (Composition::Sequential, Some(prev)) => vec![prev.clone()],
            _ => Vec::new(),
        };
        flatten_into(&child.phase, &id, requires, out);
        previous = Some(format!("{id}/{}", child.phase.id));
    }
}
