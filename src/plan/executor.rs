//! Executor labels shared with the execution engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Action kind of a leaf phase.
///
/// The builder never interprets these; the execution engine maps each label to
/// the code that carries it out.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Executor {
    UpdateConfig,
    RestartContainer,
    Drain,
    Taint,
    Untaint,
    Uncordon,
    WaitEndpoints,
    LeaderElection,
    /// Operator supplied action.
    Custom(String),
}

impl std::fmt::Display for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdateConfig => write!(f, "update-config"),
            Self::RestartContainer => write!(f, "restart-container"),
            Self::Drain => write!(f, "drain"),
            Self::Taint => write!(f, "taint"),
            Self::Untaint => write!(f, "untaint"),
            Self::Uncordon => write!(f, "uncordon"),
            Self::WaitEndpoints => write!(f, "wait-endpoints"),
            Self::LeaderElection => write!(f, "leader-election"),
            Self::Custom(label) => write!(f, "{label}"),
        }
    }
}
