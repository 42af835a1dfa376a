//! Resource Directory trait definition.

use super::errors::DirectoryError;
use crate::resources::{HealthMonitor, Listener, Member, Pool, ResourceKind};

/// Trait defining the operations the cascade orchestrator consumes.
///
/// Every call is synchronous and either returns or fails within the
/// implementation's own timeout policy. Deleting a resource that no longer
/// exists must surface as [`DirectoryError::NotFound`].
pub trait ResourceDirectory {
    fn list_listeners(&self, load_balancer_id: &str) -> Result<Vec<Listener>, DirectoryError>;

    fn list_pools(&self, listener_id: &str) -> Result<Vec<Pool>, DirectoryError>;

    fn list_health_monitors(&self, pool_id: &str) -> Result<Vec<HealthMonitor>, DirectoryError>;

    fn list_members(&self, pool_id: &str) -> Result<Vec<Member>, DirectoryError>;

    fn delete_health_monitor(&self, id: &str) -> Result<(), DirectoryError>;

    fn delete_pool(&self, id: &str) -> Result<(), DirectoryError>;

    fn delete_listener(&self, id: &str) -> Result<(), DirectoryError>;

    fn delete_load_balancer(&self, id: &str) -> Result<(), DirectoryError>;

    /// Delete a resource by kind.
    ///
    /// Members are rejected: they are removed together with their pool.
    fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), DirectoryError> {
        match kind {
            ResourceKind::HealthMonitor => self.delete_health_monitor(id),
            ResourceKind::Pool => self.delete_pool(id),
            ResourceKind::Listener => self.delete_listener(id),
            ResourceKind::LoadBalancer => self.delete_load_balancer(id),
            ResourceKind::Member => Err(DirectoryError::Unsupported { kind }),
        }
    }
}
