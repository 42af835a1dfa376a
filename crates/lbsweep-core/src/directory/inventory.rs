//! Offline Resource Directory backed by a JSON inventory snapshot.
//!
//! Follows the remote API's dependency rules: a parent that still has
//! deletable children refuses deletion with a conflict, unknown ids report
//! not found, and deleting a pool drops its members with it.

use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::errors::DirectoryError;
use super::traits::ResourceDirectory;
use crate::resources::{HealthMonitor, Listener, LoadBalancer, Member, Pool, ResourceKind};

/// Full inventory of load balancer trees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerRecord {
    #[serde(flatten)]
    pub load_balancer: LoadBalancer,
    #[serde(default)]
    pub listeners: Vec<ListenerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerRecord {
    #[serde(flatten)]
    pub listener: Listener,
    #[serde(default)]
    pub pools: Vec<PoolRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    #[serde(flatten)]
    pub pool: Pool,
    #[serde(default)]
    pub health_monitors: Vec<HealthMonitor>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Inventory {
    /// Parse the JSON structure. Ids are not checked; see [`Inventory::duplicate_id`].
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// First `(kind, id)` that appears more than once anywhere in the inventory.
    ///
    /// Lookups are by id across all load balancers, so an inventory with a
    /// duplicate would let one cascade reach into another load balancer.
    pub fn duplicate_id(&self) -> Option<(ResourceKind, &str)> {
        let mut seen: HashSet<(ResourceKind, &str)> = HashSet::new();
        let mut ids = Vec::new();

        for lb in &self.load_balancers {
            ids.push((ResourceKind::LoadBalancer, lb.load_balancer.id.as_str()));
            for listener in &lb.listeners {
                ids.push((ResourceKind::Listener, listener.listener.id.as_str()));
                for pool in &listener.pools {
                    ids.push((ResourceKind::Pool, pool.pool.id.as_str()));
                    ids.extend(
                        pool.health_monitors
                            .iter()
                            .map(|m| (ResourceKind::HealthMonitor, m.id.as_str())),
                    );
                    ids.extend(
                        pool.members
                            .iter()
                            .map(|m| (ResourceKind::Member, m.id.as_str())),
                    );
                }
            }
        }

        ids.into_iter().find(|entry| !seen.insert(*entry))
    }

    fn listener_records(&self) -> impl Iterator<Item = &ListenerRecord> {
        self.load_balancers.iter().flat_map(|lb| lb.listeners.iter())
    }

    fn pool_records(&self) -> impl Iterator<Item = &PoolRecord> {
        self.listener_records().flat_map(|l| l.pools.iter())
    }
}

/// Injected failures, consumed by the next matching call
#[cfg(test)]
#[derive(Debug, Default)]
struct Faults {
    listing: HashMap<(ResourceKind, String), DirectoryError>,
    delete: HashMap<(ResourceKind, String), DirectoryError>,
}

/// Resource Directory over an in-memory [`Inventory`].
///
/// Single-threaded by construction; it is not `Sync`.
#[derive(Debug, Default)]
pub struct InventoryDirectory {
    inventory: RefCell<Inventory>,
    #[cfg(test)]
    faults: RefCell<Faults>,
    #[cfg(test)]
    delete_calls: RefCell<Vec<(ResourceKind, String)>>,
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            event = "core.directory.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

impl InventoryDirectory {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory: RefCell::new(inventory),
            ..Default::default()
        }
    }

    /// Load an inventory snapshot from a JSON file.
    ///
    /// Fails with [`DirectoryError::InventoryParse`] when the file is not
    /// valid JSON or when a resource id is used twice for the same kind.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = fs::read_to_string(path).map_err(|e| DirectoryError::InventoryIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let inventory = Inventory::parse(&content).map_err(|e| DirectoryError::InventoryParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if let Some((kind, id)) = inventory.duplicate_id() {
            return Err(DirectoryError::InventoryParse {
                path: path.display().to_string(),
                message: format!("{} id '{}' appears more than once", kind, id),
            });
        }

        info!(
            event = "core.directory.inventory_loaded",
            path = %path.display(),
            load_balancers = inventory.load_balancers.len()
        );

        Ok(Self::new(inventory))
    }

    /// Write the current state back to a JSON file.
    ///
    /// The snapshot goes to a sibling `.tmp` file first and is renamed over
    /// `path`, so an interrupted write never truncates the previous state.
    pub fn save(&self, path: &Path) -> Result<(), DirectoryError> {
        let io_error = |source| DirectoryError::InventoryIo {
            path: path.display().to_string(),
            source,
        };

        let content = serde_json::to_string_pretty(&*self.inventory.borrow()).map_err(|e| {
            DirectoryError::InventoryParse {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let temp_file = path.with_extension("json.tmp");

        if let Err(e) = fs::write(&temp_file, &content) {
            cleanup_temp_file(&temp_file, &e);
            return Err(io_error(e));
        }

        if let Err(e) = fs::rename(&temp_file, path) {
            cleanup_temp_file(&temp_file, &e);
            return Err(io_error(e));
        }

        info!(
            event = "core.directory.inventory_saved",
            path = %path.display()
        );
        Ok(())
    }

    /// Snapshot of the current inventory
    pub fn inventory(&self) -> Inventory {
        self.inventory.borrow().clone()
    }

    /// All load balancers with their listener counts
    pub fn list_load_balancers(&self) -> Vec<(LoadBalancer, usize)> {
        self.inventory
            .borrow()
            .load_balancers
            .iter()
            .map(|lb| (lb.load_balancer.clone(), lb.listeners.len()))
            .collect()
    }

    #[cfg(test)]
    fn take_listing_fault(
        &self,
        child_kind: ResourceKind,
        parent_id: &str,
    ) -> Option<DirectoryError> {
        self.faults
            .borrow_mut()
            .listing
            .remove(&(child_kind, parent_id.to_string()))
    }

    #[cfg(not(test))]
    fn take_listing_fault(&self, _: ResourceKind, _: &str) -> Option<DirectoryError> {
        None
    }

    fn begin_delete(&self, kind: ResourceKind, id: &str) -> Result<(), DirectoryError> {
        debug!(event = "core.directory.delete_requested", kind = %kind, id = id);

        #[cfg(test)]
        {
            self.delete_calls.borrow_mut().push((kind, id.to_string()));
            if let Some(error) = self.faults.borrow_mut().delete.remove(&(kind, id.to_string())) {
                return Err(error);
            }
        }

        Ok(())
    }
}

/// Fault injection and call recording for unit tests
#[cfg(test)]
impl InventoryDirectory {
    /// Make the next listing of `child_kind` under `parent_id` fail.
    pub(crate) fn fail_listing(
        &self,
        child_kind: ResourceKind,
        parent_id: impl Into<String>,
        error: DirectoryError,
    ) {
        self.faults
            .borrow_mut()
            .listing
            .insert((child_kind, parent_id.into()), error);
    }

    /// Make the next delete of `kind` `id` fail.
    pub(crate) fn fail_delete(
        &self,
        kind: ResourceKind,
        id: impl Into<String>,
        error: DirectoryError,
    ) {
        self.faults
            .borrow_mut()
            .delete
            .insert((kind, id.into()), error);
    }

    /// Every delete call received, in order, including failed ones
    pub(crate) fn delete_calls(&self) -> Vec<(ResourceKind, String)> {
        self.delete_calls.borrow().clone()
    }
}

impl ResourceDirectory for InventoryDirectory {
    fn list_listeners(&self, load_balancer_id: &str) -> Result<Vec<Listener>, DirectoryError> {
        if let Some(error) = self.take_listing_fault(ResourceKind::Listener, load_balancer_id) {
            return Err(error);
        }

        let inventory = self.inventory.borrow();
        let lb = inventory
            .load_balancers
            .iter()
            .find(|lb| lb.load_balancer.id == load_balancer_id)
            .ok_or_else(|| {
                DirectoryError::not_found(ResourceKind::LoadBalancer, load_balancer_id)
            })?;

        Ok(lb.listeners.iter().map(|l| l.listener.clone()).collect())
    }

    fn list_pools(&self, listener_id: &str) -> Result<Vec<Pool>, DirectoryError> {
        if let Some(error) = self.take_listing_fault(ResourceKind::Pool, listener_id) {
            return Err(error);
        }

        let inventory = self.inventory.borrow();
        let listener = inventory
            .listener_records()
            .find(|l| l.listener.id == listener_id)
            .ok_or_else(|| DirectoryError::not_found(ResourceKind::Listener, listener_id))?;

        Ok(listener.pools.iter().map(|p| p.pool.clone()).collect())
    }

    fn list_health_monitors(&self, pool_id: &str) -> Result<Vec<HealthMonitor>, DirectoryError> {
        if let Some(error) = self.take_listing_fault(ResourceKind::HealthMonitor, pool_id) {
            return Err(error);
        }

        let inventory = self.inventory.borrow();
        let pool = inventory
            .pool_records()
            .find(|p| p.pool.id == pool_id)
            .ok_or_else(|| DirectoryError::not_found(ResourceKind::Pool, pool_id))?;

        Ok(pool.health_monitors.clone())
    }

    fn list_members(&self, pool_id: &str) -> Result<Vec<Member>, DirectoryError> {
        if let Some(error) = self.take_listing_fault(ResourceKind::Member, pool_id) {
            return Err(error);
        }

        let inventory = self.inventory.borrow();
        let pool = inventory
            .pool_records()
            .find(|p| p.pool.id == pool_id)
            .ok_or_else(|| DirectoryError::not_found(ResourceKind::Pool, pool_id))?;

        Ok(pool.members.clone())
    }

    fn delete_health_monitor(&self, id: &str) -> Result<(), DirectoryError> {
        self.begin_delete(ResourceKind::HealthMonitor, id)?;

        let mut inventory = self.inventory.borrow_mut();
        for lb in &mut inventory.load_balancers {
            for listener in &mut lb.listeners {
                for pool in &mut listener.pools {
                    if let Some(pos) = pool.health_monitors.iter().position(|m| m.id == id) {
                        pool.health_monitors.remove(pos);
                        return Ok(());
                    }
                }
            }
        }

        Err(DirectoryError::not_found(ResourceKind::HealthMonitor, id))
    }

    fn delete_pool(&self, id: &str) -> Result<(), DirectoryError> {
        self.begin_delete(ResourceKind::Pool, id)?;

        let mut inventory = self.inventory.borrow_mut();
        for lb in &mut inventory.load_balancers {
            for listener in &mut lb.listeners {
                if let Some(pos) = listener.pools.iter().position(|p| p.pool.id == id) {
                    let monitors = listener.pools[pos].health_monitors.len();
                    if monitors > 0 {
                        return Err(DirectoryError::conflict(
                            ResourceKind::Pool,
                            id,
                            format!("{} health monitor(s) still attached", monitors),
                        ));
                    }
                    // Members go away with the pool
                    listener.pools.remove(pos);
                    return Ok(());
                }
            }
        }

        Err(DirectoryError::not_found(ResourceKind::Pool, id))
    }

    fn delete_listener(&self, id: &str) -> Result<(), DirectoryError> {
        self.begin_delete(ResourceKind::Listener, id)?;

        let mut inventory = self.inventory.borrow_mut();
        for lb in &mut inventory.load_balancers {
            if let Some(pos) = lb.listeners.iter().position(|l| l.listener.id == id) {
                let pools = lb.listeners[pos].pools.len();
                if pools > 0 {
                    return Err(DirectoryError::conflict(
                        ResourceKind::Listener,
                        id,
                        format!("{} pool(s) still attached", pools),
                    ));
                }
                lb.listeners.remove(pos);
                return Ok(());
            }
        }

        Err(DirectoryError::not_found(ResourceKind::Listener, id))
    }

    fn delete_load_balancer(&self, id: &str) -> Result<(), DirectoryError> {
        self.begin_delete(ResourceKind::LoadBalancer, id)?;

        let mut inventory = self.inventory.borrow_mut();
        let pos = inventory
            .load_balancers
            .iter()
            .position(|lb| lb.load_balancer.id == id)
            .ok_or_else(|| DirectoryError::not_found(ResourceKind::LoadBalancer, id))?;

        let listeners = inventory.load_balancers[pos].listeners.len();
        if listeners > 0 {
            return Err(DirectoryError::conflict(
                ResourceKind::LoadBalancer,
                id,
                format!("{} listener(s) still attached", listeners),
            ));
        }
        inventory.load_balancers.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "load_balancers": [
            {
                "id": "lb-1",
                "name": "web",
                "listeners": [
                    {
                        "id": "l-1",
                        "pools": [
                            {
                                "id": "p-1",
                                "health_monitors": [{ "id": "m-1" }],
                                "members": [{ "id": "mem-1", "address": "10.0.0.5" }]
                            }
                        ]
                    }
                ]
            },
            { "id": "lb-2" }
        ]
    }"#;

    fn sample_directory() -> InventoryDirectory {
        InventoryDirectory::new(Inventory::parse(SAMPLE).unwrap())
    }

    #[test]
    fn test_parse_sample_inventory() {
        let inventory = Inventory::parse(SAMPLE).unwrap();
        assert_eq!(inventory.load_balancers.len(), 2);
        assert_eq!(
            inventory.load_balancers[0].load_balancer.name.as_deref(),
            Some("web")
        );
        assert!(inventory.load_balancers[1].listeners.is_empty());
    }

    #[test]
    fn test_listings_follow_the_tree() {
        let directory = sample_directory();
        assert_eq!(directory.list_listeners("lb-1").unwrap(), vec![Listener::new("l-1")]);
        assert_eq!(directory.list_pools("l-1").unwrap(), vec![Pool::new("p-1")]);
        assert_eq!(
            directory.list_health_monitors("p-1").unwrap(),
            vec![HealthMonitor::new("m-1")]
        );
        let members = directory.list_members("p-1").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].address.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_listing_unknown_parent_is_not_found() {
        let directory = sample_directory();
        let error = directory.list_pools("l-404").unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_delete_parent_with_children_conflicts() {
        let directory = sample_directory();

        let error = directory.delete_pool("p-1").unwrap_err();
        assert!(matches!(error, DirectoryError::Conflict { .. }));

        let error = directory.delete_load_balancer("lb-1").unwrap_err();
        assert!(matches!(error, DirectoryError::Conflict { .. }));
    }

    #[test]
    fn test_bottom_up_delete_empties_tree() {
        let directory = sample_directory();
        directory.delete_health_monitor("m-1").unwrap();
        directory.delete_pool("p-1").unwrap();
        directory.delete_listener("l-1").unwrap();
        directory.delete_load_balancer("lb-1").unwrap();

        let remaining = directory.list_load_balancers();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0.id, "lb-2");
        assert_eq!(directory.delete_calls().len(), 4);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let directory = sample_directory();
        let error = directory.delete_health_monitor("m-404").unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(
            directory.delete_calls(),
            vec![(ResourceKind::HealthMonitor, "m-404".to_string())]
        );
    }

    #[test]
    fn test_injected_faults_fire_once() {
        let directory = sample_directory();
        directory.fail_listing(
            ResourceKind::Pool,
            "l-1",
            DirectoryError::transport("connection reset"),
        );
        directory.fail_delete(
            ResourceKind::HealthMonitor,
            "m-1",
            DirectoryError::conflict(ResourceKind::HealthMonitor, "m-1", "PENDING_UPDATE"),
        );

        assert!(directory.list_pools("l-1").is_err());
        assert!(directory.list_pools("l-1").is_ok());

        assert!(directory.delete_health_monitor("m-1").is_err());
        assert!(directory.delete_health_monitor("m-1").is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inventory.json");

        let directory = sample_directory();
        directory.delete_health_monitor("m-1").unwrap();
        directory.save(&path).unwrap();

        let reloaded = InventoryDirectory::load(&path).unwrap();
        assert!(reloaded.list_health_monitors("p-1").unwrap().is_empty());
        assert_eq!(reloaded.list_members("p-1").unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = InventoryDirectory::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(DirectoryError::InventoryIo { .. })));
    }

    #[test]
    fn test_load_rejects_ids_shared_across_load_balancers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inventory.json");
        fs::write(
            &path,
            r#"{"load_balancers":[
                {"id":"lb-0","listeners":[{"id":"l-0","pools":[
                    {"id":"p-0","health_monitors":[{"id":"m-1"}]}]}]},
                {"id":"lb-1","listeners":[{"id":"l-1","pools":[
                    {"id":"p-1","health_monitors":[{"id":"m-1"}]}]}]}]}"#,
        )
        .unwrap();

        let error = InventoryDirectory::load(&path).unwrap_err();
        match error {
            DirectoryError::InventoryParse { message, .. } => {
                assert_eq!(message, "healthmonitor id 'm-1' appears more than once");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_id_for_different_kinds_is_allowed() {
        let inventory = Inventory::parse(
            r#"{"load_balancers":[{"id":"x","listeners":[{"id":"x","pools":[{"id":"x"}]}]}]}"#,
        )
        .unwrap();
        assert_eq!(inventory.duplicate_id(), None);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inventory.json");

        sample_directory().save(&path).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("inventory.json.tmp").exists());
    }

    #[test]
    fn test_save_cleans_up_temp_file_on_rename_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the rename fail
        let path = temp_dir.path().join("inventory.json");
        fs::create_dir_all(&path).unwrap();

        let result = sample_directory().save(&path);

        assert!(matches!(result, Err(DirectoryError::InventoryIo { .. })));
        assert!(
            !temp_dir.path().join("inventory.json.tmp").exists(),
            "Temp file should be cleaned up after rename failure"
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = InventoryDirectory::load(&path);
        assert!(matches!(result, Err(DirectoryError::InventoryParse { .. })));
    }
}
