//! Deletion execution: run a plan strictly in order, one call per task.

use chrono::Utc;
use tracing::{error, info};

use crate::cascade::errors::DeletionError;
use crate::cascade::observer::CascadeObserver;
use crate::cascade::types::{
    CascadeOptions, CompletedTask, DeletionPlan, ExecutionReport, TaskOutcome,
};
use crate::directory::ResourceDirectory;

/// Execute `plan` against `directory`.
///
/// In dry-run mode no delete call is made. Otherwise each task is a single,
/// non-retried delete; "not found" counts as success. The first other
/// failure stops the run and is returned together with what completed and
/// what was never attempted. Earlier deletions are not rolled back.
pub fn execute(
    directory: &dyn ResourceDirectory,
    plan: &DeletionPlan,
    options: &CascadeOptions,
    observer: &mut dyn CascadeObserver,
) -> Result<ExecutionReport, DeletionError> {
    let started_at = Utc::now();
    info!(
        event = "core.cascade.execution_started",
        load_balancer_id = plan.load_balancer_id(),
        tasks = plan.tasks.len(),
        dry_run = options.dry_run
    );

    let mut completed: Vec<CompletedTask> = Vec::with_capacity(plan.tasks.len());

    for (index, task) in plan.tasks.iter().enumerate() {
        observer.on_task_started(task, options.dry_run);

        let outcome = if options.dry_run {
            TaskOutcome::WouldDelete
        } else {
            match directory.delete(task.kind, &task.id) {
                Ok(()) => TaskOutcome::Deleted,
                Err(e) if e.is_not_found() => {
                    info!(
                        event = "core.cascade.task_already_absent",
                        kind = %task.kind,
                        id = %task.id
                    );
                    TaskOutcome::AlreadyAbsent
                }
                Err(e) => {
                    error!(
                        event = "core.cascade.execution_halted",
                        kind = %task.kind,
                        id = %task.id,
                        completed = completed.len(),
                        not_attempted = plan.tasks.len() - index - 1,
                        error = %e
                    );
                    observer.on_task_failed(task, &e);
                    return Err(DeletionError {
                        failed: task.clone(),
                        source: e,
                        completed,
                        not_attempted: plan.tasks[index + 1..].to_vec(),
                    });
                }
            }
        };

        let done = CompletedTask {
            task: task.clone(),
            outcome,
        };
        observer.on_task_completed(&done);
        completed.push(done);
    }

    let report = ExecutionReport {
        load_balancer_id: plan.load_balancer_id().to_string(),
        dry_run: options.dry_run,
        started_at,
        finished_at: Utc::now(),
        completed,
        members_skipped: plan.tree.member_count(),
    };

    info!(
        event = "core.cascade.execution_completed",
        load_balancer_id = %report.load_balancer_id,
        dry_run = report.dry_run,
        deleted = report.count(TaskOutcome::Deleted),
        already_absent = report.count(TaskOutcome::AlreadyAbsent),
        would_delete = report.count(TaskOutcome::WouldDelete)
    );

    Ok(report)
}
