//! Reporting hooks for a cascade run.
//!
//! Observers only watch. They cannot reorder, skip or abort tasks.

use tracing::{error, info};

use crate::cascade::types::{CompletedTask, DeletionPlan, DeletionTask, TaskOutcome};
use crate::directory::DirectoryError;
use crate::resources::ResourceKind;

pub trait CascadeObserver {
    /// A resource was found while walking the tree. `parent_id` is `None`
    /// only for the load balancer itself.
    fn on_discovered(&mut self, _kind: ResourceKind, _id: &str, _parent_id: Option<&str>) {}

    fn on_plan_ready(&mut self, _plan: &DeletionPlan) {}

    fn on_task_started(&mut self, _task: &DeletionTask, _dry_run: bool) {}

    fn on_task_completed(&mut self, _completed: &CompletedTask) {}

    fn on_task_failed(&mut self, _task: &DeletionTask, _error: &DirectoryError) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CascadeObserver for NoopObserver {}

/// Observer that emits one structured event per discovered and per
/// processed resource
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CascadeObserver for TracingObserver {
    fn on_discovered(&mut self, kind: ResourceKind, id: &str, parent_id: Option<&str>) {
        info!(
            event = "core.cascade.resource_discovered",
            kind = %kind,
            id = id,
            parent_id = parent_id
        );
    }

    fn on_plan_ready(&mut self, plan: &DeletionPlan) {
        info!(
            event = "core.cascade.plan_ready",
            load_balancer_id = plan.load_balancer_id(),
            tasks = plan.tasks.len(),
            members = plan.tree.member_count()
        );
    }

    fn on_task_completed(&mut self, completed: &CompletedTask) {
        info!(
            event = "core.cascade.task_completed",
            kind = %completed.task.kind,
            id = %completed.task.id,
            outcome = completed.outcome.as_str()
        );
    }

    fn on_task_failed(&mut self, task: &DeletionTask, error: &DirectoryError) {
        error!(
            event = "core.cascade.task_failed",
            kind = %task.kind,
            id = %task.id,
            error = %error
        );
    }
}

/// Render a processed task the way the console reports it
pub fn describe_outcome(completed: &CompletedTask) -> String {
    match completed.outcome {
        TaskOutcome::WouldDelete => format!("would delete {}", completed.task),
        TaskOutcome::Deleted => format!("deleted {}", completed.task),
        TaskOutcome::AlreadyAbsent => format!("{} already gone", completed.task),
    }
}
