//! Rolling update plan: the phase tree handed to the execution engine.

pub mod executor;
pub mod flatten;
pub mod phase;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use executor::Executor;
pub use flatten::FlatPhase;
pub use phase::{ChildPhase, Composition, Phase, PhaseData};

/// A built plan together with the operation it belongs to.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub operation_id: String,
    pub cluster_name: String,
    pub created: DateTime<Utc>,
    pub root: Phase,
}

impl Plan {
    pub fn new(
        operation_id: impl Into<String>,
        cluster_name: impl Into<String>,
        root: Phase,
    ) -> Self {
        Self {
            operation_id: operation_id.into(),
            cluster_name: cluster_name.into(),
            created: Utc::now(),
            root,
        }
    }
}
