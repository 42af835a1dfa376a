//! Tree discovery: walk a load balancer depth-first and build its plan.

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::cascade::errors::DiscoveryError;
use crate::cascade::observer::CascadeObserver;
use crate::cascade::types::{DeletionPlan, ListenerNode, LoadBalancerTree, PoolNode};
use crate::directory::{DirectoryError, ResourceDirectory};
use crate::resources::ResourceKind;

/// Walk the tree under `load_balancer_id` and build a bottom-up plan.
///
/// Any listing failure aborts the walk; no partial plan is ever returned.
/// A listing that reports its own parent as not found yields no children,
/// so a re-run against an already removed subtree still plans cleanly.
pub fn discover(
    directory: &dyn ResourceDirectory,
    load_balancer_id: &str,
    observer: &mut dyn CascadeObserver,
) -> Result<DeletionPlan, DiscoveryError> {
    info!(
        event = "core.cascade.discovery_started",
        load_balancer_id = load_balancer_id
    );

    let mut seen = SeenResources::default();
    observer.on_discovered(ResourceKind::LoadBalancer, load_balancer_id, None);

    let listeners = list_children(
        ResourceKind::LoadBalancer,
        load_balancer_id,
        ResourceKind::Listener,
        directory.list_listeners(load_balancer_id),
    )?;

    let mut listener_nodes = Vec::with_capacity(listeners.len());
    for listener in listeners {
        seen.insert(ResourceKind::Listener, &listener.id, load_balancer_id)?;
        observer.on_discovered(ResourceKind::Listener, &listener.id, Some(load_balancer_id));

        let pools = list_children(
            ResourceKind::Listener,
            &listener.id,
            ResourceKind::Pool,
            directory.list_pools(&listener.id),
        )?;

        let mut pool_nodes = Vec::with_capacity(pools.len());
        for pool in pools {
            seen.insert(ResourceKind::Pool, &pool.id, &listener.id)?;
            observer.on_discovered(ResourceKind::Pool, &pool.id, Some(listener.id.as_str()));

            let health_monitors = list_children(
                ResourceKind::Pool,
                &pool.id,
                ResourceKind::HealthMonitor,
                directory.list_health_monitors(&pool.id),
            )?;
            for monitor in &health_monitors {
                seen.insert(ResourceKind::HealthMonitor, &monitor.id, &pool.id)?;
                observer.on_discovered(
                    ResourceKind::HealthMonitor,
                    &monitor.id,
                    Some(pool.id.as_str()),
                );
            }

            let members = list_children(
                ResourceKind::Pool,
                &pool.id,
                ResourceKind::Member,
                directory.list_members(&pool.id),
            )?;
            for member in &members {
                seen.insert(ResourceKind::Member, &member.id, &pool.id)?;
                observer.on_discovered(ResourceKind::Member, &member.id, Some(pool.id.as_str()));
            }

            pool_nodes.push(PoolNode {
                pool,
                health_monitors,
                members,
            });
        }

        listener_nodes.push(ListenerNode {
            listener,
            pools: pool_nodes,
        });
    }

    let plan = DeletionPlan::from_tree(LoadBalancerTree {
        load_balancer_id: load_balancer_id.to_string(),
        listeners: listener_nodes,
    });

    info!(
        event = "core.cascade.discovery_completed",
        load_balancer_id = load_balancer_id,
        tasks = plan.tasks.len(),
        members = plan.tree.member_count()
    );
    observer.on_plan_ready(&plan);

    Ok(plan)
}

/// Unwrap a listing result, attributing failures to the parent.
fn list_children<T>(
    parent_kind: ResourceKind,
    parent_id: &str,
    child_kind: ResourceKind,
    result: Result<Vec<T>, DirectoryError>,
) -> Result<Vec<T>, DiscoveryError> {
    match result {
        Ok(children) => Ok(children),
        Err(DirectoryError::NotFound { kind, id }) if kind == parent_kind && id == parent_id => {
            warn!(
                event = "core.cascade.parent_absent",
                parent_kind = %parent_kind,
                parent_id = parent_id,
                child_kind = %child_kind
            );
            Ok(Vec::new())
        }
        Err(source) => {
            error!(
                event = "core.cascade.listing_failed",
                parent_kind = %parent_kind,
                parent_id = parent_id,
                child_kind = %child_kind,
                error = %source
            );
            Err(DiscoveryError::ListingFailed {
                parent_kind,
                parent_id: parent_id.to_string(),
                child_kind,
                source,
            })
        }
    }
}

/// Tracks every id seen so far, keyed by kind, with the parent it came from
#[derive(Debug, Default)]
struct SeenResources {
    parents: HashMap<(ResourceKind, String), String>,
}

impl SeenResources {
    fn insert(
        &mut self,
        kind: ResourceKind,
        id: &str,
        parent_id: &str,
    ) -> Result<(), DiscoveryError> {
        let key = (kind, id.to_string());
        if let Some(first_parent) = self.parents.get(&key) {
            error!(
                event = "core.cascade.duplicate_resource",
                kind = %kind,
                id = id,
                first_parent = %first_parent,
                second_parent = parent_id
            );
            return Err(DiscoveryError::DuplicateResource {
                kind,
                id: id.to_string(),
                first_parent: first_parent.clone(),
                second_parent: parent_id.to_string(),
            });
        }
        self.parents.insert(key, parent_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::observer::NoopObserver;
    use crate::directory::{Inventory, InventoryDirectory};

    fn directory(json: &str) -> InventoryDirectory {
        InventoryDirectory::new(Inventory::parse(json).unwrap())
    }

    #[derive(Default)]
    struct Discovered(Vec<String>);

    impl CascadeObserver for Discovered {
        fn on_discovered(&mut self, kind: ResourceKind, id: &str, parent_id: Option<&str>) {
            self.0
                .push(format!("{}:{}<{}", kind, id, parent_id.unwrap_or("-")));
        }
    }

    #[test]
    fn test_discovers_full_tree() {
        let directory = directory(
            r#"{"load_balancers":[{"id":"lb-1","listeners":[{"id":"l-1","pools":[
                {"id":"p-1","health_monitors":[{"id":"m-1"}],"members":[{"id":"mem-1"}]}]}]}]}"#,
        );
        let mut observer = Discovered::default();

        let plan = discover(&directory, "lb-1", &mut observer).unwrap();

        assert_eq!(
            observer.0,
            vec![
                "loadbalancer:lb-1<-",
                "listener:l-1<lb-1",
                "pool:p-1<l-1",
                "healthmonitor:m-1<p-1",
                "member:mem-1<p-1",
            ]
        );
        assert_eq!(plan.tasks.len(), 4);
        assert_eq!(plan.tree.member_count(), 1);
    }

    #[test]
    fn test_listener_without_pools_contributes_only_itself() {
        let directory =
            directory(r#"{"load_balancers":[{"id":"lb-1","listeners":[{"id":"l-1"}]}]}"#);
        let plan = discover(&directory, "lb-1", &mut NoopObserver).unwrap();

        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.position(ResourceKind::Listener, "l-1"), Some(0));
        assert_eq!(plan.position(ResourceKind::LoadBalancer, "lb-1"), Some(1));
    }

    #[test]
    fn test_missing_load_balancer_plans_only_itself() {
        let directory = directory(r#"{"load_balancers":[]}"#);
        let plan = discover(&directory, "lb-gone", &mut NoopObserver).unwrap();

        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].kind, ResourceKind::LoadBalancer);
        assert_eq!(plan.tasks[0].id, "lb-gone");
    }

    #[test]
    fn test_member_listing_failure_aborts() {
        let directory = directory(
            r#"{"load_balancers":[{"id":"lb-1","listeners":[{"id":"l-1","pools":[{"id":"p-1"}]}]}]}"#,
        );
        directory.fail_listing(
            ResourceKind::Member,
            "p-1",
            DirectoryError::Unauthorized {
                message: "token expired".to_string(),
            },
        );

        let error = discover(&directory, "lb-1", &mut NoopObserver).unwrap_err();
        match error {
            DiscoveryError::ListingFailed {
                parent_kind,
                parent_id,
                child_kind,
                ..
            } => {
                assert_eq!(parent_kind, ResourceKind::Pool);
                assert_eq!(parent_id, "p-1");
                assert_eq!(child_kind, ResourceKind::Member);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found_for_other_resource_is_a_failure() {
        let directory =
            directory(r#"{"load_balancers":[{"id":"lb-1","listeners":[{"id":"l-1"}]}]}"#);
        directory.fail_listing(
            ResourceKind::Pool,
            "l-1",
            DirectoryError::not_found(ResourceKind::LoadBalancer, "lb-1"),
        );

        let result = discover(&directory, "lb-1", &mut NoopObserver);
        assert!(matches!(result, Err(DiscoveryError::ListingFailed { .. })));
    }

    #[test]
    fn test_shared_pool_is_rejected() {
        let directory = directory(
            r#"{"load_balancers":[{"id":"lb-1","listeners":[
                {"id":"l-1","pools":[{"id":"p-1"}]},
                {"id":"l-2","pools":[{"id":"p-1"}]}]}]}"#,
        );

        let error = discover(&directory, "lb-1", &mut NoopObserver).unwrap_err();
        match error {
            DiscoveryError::DuplicateResource {
                kind,
                id,
                first_parent,
                second_parent,
            } => {
                assert_eq!(kind, ResourceKind::Pool);
                assert_eq!(id, "p-1");
                assert_eq!(first_parent, "l-1");
                assert_eq!(second_parent, "l-2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
