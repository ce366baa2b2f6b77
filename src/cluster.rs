//! Cluster model: servers, the application manifest and computed updates.

pub mod manifest;
pub mod server;
pub mod update;

pub use manifest::{Manifest, Profile};
pub use server::{ClusterRole, Server};
pub use update::{ElectionChange, RuntimePackage, RuntimeUpdate, UpdateServer};
