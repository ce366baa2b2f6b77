//! rollplan - rolling update plans for Kubernetes clusters.
//!
//! Builds the ordered tree of drain, restart, taint and leader election steps
//! that updates the runtime of every master and worker node without losing
//! quorum. Plans are only constructed here; executing them is up to the
//! execution engine that receives the tree.

pub mod cluster;
pub mod description;
pub mod error;
pub mod loc;
pub mod plan;
pub mod rollingupdate;

pub use error::PlanError;
