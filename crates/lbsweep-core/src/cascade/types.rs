use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::resources::{HealthMonitor, Listener, Member, Pool, ResourceKind};

/// A single delete call the orchestrator intends to make
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeletionTask {
    pub kind: ResourceKind,
    pub id: String,
}

impl DeletionTask {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeletionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.display_name(), self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolNode {
    pub pool: Pool,
    pub health_monitors: Vec<HealthMonitor>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListenerNode {
    pub listener: Listener,
    pub pools: Vec<PoolNode>,
}

/// Snapshot of everything hanging off one load balancer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerTree {
    pub load_balancer_id: String,
    pub listeners: Vec<ListenerNode>,
}

impl LoadBalancerTree {
    pub fn pools(&self) -> impl Iterator<Item = &PoolNode> {
        self.listeners.iter().flat_map(|l| l.pools.iter())
    }

    pub fn member_count(&self) -> usize {
        self.pools().map(|p| p.members.len()).sum()
    }

    /// Resources in depth-first discovery order, parents before children.
    ///
    /// Members are included; callers that build delete tasks filter them.
    pub fn resources(&self) -> Vec<DeletionTask> {
        let mut resources = vec![DeletionTask::new(
            ResourceKind::LoadBalancer,
            &self.load_balancer_id,
        )];
        for listener in &self.listeners {
            resources.push(DeletionTask::new(
                ResourceKind::Listener,
                &listener.listener.id,
            ));
            for pool in &listener.pools {
                resources.push(DeletionTask::new(ResourceKind::Pool, &pool.pool.id));
                for monitor in &pool.health_monitors {
                    resources.push(DeletionTask::new(ResourceKind::HealthMonitor, &monitor.id));
                }
                for member in &pool.members {
                    resources.push(DeletionTask::new(ResourceKind::Member, &member.id));
                }
            }
        }
        resources
    }
}

/// Discovered tree plus the bottom-up order in which to delete it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionPlan {
    pub tree: LoadBalancerTree,
    pub tasks: Vec<DeletionTask>,
}

impl DeletionPlan {
    /// Build the plan for a discovered tree.
    ///
    /// Tasks are grouped by level: every health monitor, then every pool,
    /// then every listener, then the load balancer. The sort is stable, so
    /// discovery order is kept within a level. Members get no task.
    pub fn from_tree(tree: LoadBalancerTree) -> Self {
        let mut tasks: Vec<DeletionTask> = tree
            .resources()
            .into_iter()
            .filter(|r| r.kind.delete_priority().is_some())
            .collect();
        tasks.sort_by_key(|t| t.kind.delete_priority());

        Self { tree, tasks }
    }

    pub fn load_balancer_id(&self) -> &str {
        &self.tree.load_balancer_id
    }

    pub fn position(&self, kind: ResourceKind, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.kind == kind && t.id == id)
    }
}

/// Options controlling a cascade run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOptions {
    /// Report what would be deleted without issuing delete calls
    pub dry_run: bool,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

impl CascadeOptions {
    pub fn destructive() -> Self {
        Self { dry_run: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Delete call succeeded
    Deleted,
    /// Directory reported the resource as already gone
    AlreadyAbsent,
    /// Dry run, no call issued
    WouldDelete,
}

impl TaskOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskOutcome::Deleted => "deleted",
            TaskOutcome::AlreadyAbsent => "already absent",
            TaskOutcome::WouldDelete => "would delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTask {
    #[serde(flatten)]
    pub task: DeletionTask,
    pub outcome: TaskOutcome,
}

/// Result of a cascade run that reached the end of its plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub load_balancer_id: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub completed: Vec<CompletedTask>,
    /// Members enumerated but left for the pool deletion to remove
    pub members_skipped: usize,
}

impl ExecutionReport {
    pub fn count(&self, outcome: TaskOutcome) -> usize {
        self.completed
            .iter()
            .filter(|c| c.outcome == outcome)
            .count()
    }
}
