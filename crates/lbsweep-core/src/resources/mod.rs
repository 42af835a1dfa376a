//! Load balancer resource model.
//!
//! All entities are read-only snapshots taken while walking a load
//! balancer's dependency tree.

pub mod types;

pub use types::{HealthMonitor, Listener, LoadBalancer, Member, Pool, ResourceKind};
