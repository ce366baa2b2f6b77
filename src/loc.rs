//! Package locators.
//!
//! A locator names one versioned package in a repository and is written as
//! `repository/name:version`, e.g. `gravitational.io/planet:7.0.35-11706`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlanError;

/// Identity of a versioned package.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator {
    pub repository: String,
    pub name: String,
    pub version: String,
}

impl Locator {
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns a locator for a package in the same repository with the given name and version.
    pub fn sibling(&self, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(self.repository.clone(), name, version)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.repository, self.name, self.version)
    }
}

impl FromStr for Locator {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlanError::InvalidLocator(s.to_string());

        let (repository, rest) = s.split_once('/').ok_or_else(invalid)?;
        let (name, version) = rest.split_once(':').ok_or_else(invalid)?;

        if [repository, name, version].iter().any(|p| p.trim().is_empty()) || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(repository, name, version))
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for Locator {
    fn schema_name() -> Cow<'static, str> {
        "Locator".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Package locator in the form repository/name:version",
            "pattern": "^[^/]+/[^/:]+:.+$"
        })
    }
}
