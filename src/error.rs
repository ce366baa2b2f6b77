//! Custom error types for rollplan.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by a rotation collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving updates or building a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Runtime package not found for role: {role}")]
    PackageNotFound { role: String },

    #[error("[{hostname}] Failed to rotate {stage} package: {source}")]
    Rotation {
        hostname: String,
        stage: RotationStage,
        #[source]
        source: BoxError,
    },

    #[error("Cannot build {0} phase from an empty server list")]
    EmptyServerList(&'static str),

    #[error("Cluster has no master servers")]
    NoMasters,

    #[error("Invalid package locator: {0}")]
    InvalidLocator(String),

    #[error("[{0}] Server appears more than once in the rollout")]
    DuplicateServer(String),

    #[error("Custom step id {0:?} is empty or clashes with a built-in step")]
    ReservedStepId(String),
}

/// Which dry-run rotation a [`PlanError::Rotation`] happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationStage {
    Config,
    Secrets,
}

impl fmt::Display for RotationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Secrets => write!(f, "secrets"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_package_not_found() {
        let err = PlanError::PackageNotFound {
            role: "db".to_string(),
        };
        assert_eq!(err.to_string(), "Runtime package not found for role: db");
    }

    #[test]
    fn test_error_display_rotation() {
        let err = PlanError::Rotation {
            hostname: "node-1".to_string(),
            stage: RotationStage::Secrets,
            source: "certificate authority unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "[node-1] Failed to rotate secrets package: certificate authority unavailable"
        );
    }

    #[test]
    fn test_error_rotation_keeps_source() {
        use std::error::Error as _;

        let err = PlanError::Rotation {
            hostname: "node-1".to_string(),
            stage: RotationStage::Config,
            source: anyhow::anyhow!("package service timed out").into(),
        };
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "package service timed out");
    }

    #[test]
    fn test_error_display_empty_server_list() {
        let err = PlanError::EmptyServerList("masters");
        assert_eq!(
            err.to_string(),
            "Cannot build masters phase from an empty server list"
        );
    }

    #[test]
    fn test_error_display_duplicate_server() {
        let err = PlanError::DuplicateServer("master-a".to_string());
        assert_eq!(
            err.to_string(),
            "[master-a] Server appears more than once in the rollout"
        );
    }

    #[test]
    fn test_error_display_reserved_step_id() {
        let err = PlanError::ReservedStepId("taint".to_string());
        assert_eq!(
            err.to_string(),
            r#"Custom step id "taint" is empty or clashes with a built-in step"#
        );
    }

    #[test]
    fn test_rotation_stage_display() {
        assert_eq!(RotationStage::Config.to_string(), "config");
        assert_eq!(RotationStage::Secrets.to_string(), "secrets");
    }
}
