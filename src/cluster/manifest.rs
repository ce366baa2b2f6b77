//! Application manifest: which runtime package each server role runs.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::loc::Locator;

/// Subset of the application manifest needed to plan runtime updates.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Runtime package used by every profile without an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_runtime: Option<Locator>,

    /// Server profiles keyed by role name.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// A server profile.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Profile-specific runtime package, overriding the system runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_package: Option<Locator>,
}

impl Manifest {
    /// Returns the runtime package servers with the given role run.
    ///
    /// Unknown roles are an error. Known roles without an override fall back to
    /// the system runtime.
    pub fn runtime_package_for_role(&self, role: &str) -> Result<&Locator, PlanError> {
        let not_found = || PlanError::PackageNotFound {
            role: role.to_string(),
        };

        let profile = self.profiles.get(role).ok_or_else(not_found)?;
        profile
            .runtime_package
            .as_ref()
            .or(self.system_runtime.as_ref())
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        let yaml = r"
systemRuntime: gravitational.io/planet:7.0.35
profiles:
  master:
    description: Control plane server
  gpu:
    runtimePackage: gravitational.io/planet-gpu:7.0.35
";
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_runtime_package_falls_back_to_system_runtime() {
        let m = manifest();
        let loc = m.runtime_package_for_role("master").unwrap();
        assert_eq!(loc.to_string(), "gravitational.io/planet:7.0.35");
    }

    #[test]
    fn test_runtime_package_profile_override() {
        let m = manifest();
        let loc = m.runtime_package_for_role("gpu").unwrap();
        assert_eq!(loc.name, "planet-gpu");
    }

    #[test]
    fn test_runtime_package_unknown_role() {
        let m = manifest();
        let err = m.runtime_package_for_role("db").unwrap_err();
        assert!(matches!(err, PlanError::PackageNotFound { ref role } if role == "db"));
    }

    #[test]
    fn test_runtime_package_without_system_runtime() {
        let mut m = manifest();
        m.system_runtime = None;
        assert!(m.runtime_package_for_role("master").is_err());
        assert!(m.runtime_package_for_role("gpu").is_ok());
    }
}
