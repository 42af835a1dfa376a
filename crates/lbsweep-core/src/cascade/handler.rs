use tracing::{error, info};

use crate::cascade::errors::CascadeError;
use crate::cascade::observer::CascadeObserver;
use crate::cascade::types::{CascadeOptions, ExecutionReport};
use crate::cascade::{discovery, execution};
use crate::directory::ResourceDirectory;

/// Delete a load balancer and everything attached to it.
///
/// Discovers the full tree first; only a complete plan is executed. With
/// the default options this is a dry run that reports the plan without
/// touching remote state.
///
/// # Errors
///
/// * [`CascadeError::InvalidTarget`] - empty id, no remote call was made
/// * [`CascadeError::Discovery`] - a listing failed, nothing was deleted
/// * [`CascadeError::Deletion`] - a delete failed, carries partial progress
pub fn cascade_delete(
    directory: &dyn ResourceDirectory,
    load_balancer_id: &str,
    options: &CascadeOptions,
    observer: &mut dyn CascadeObserver,
) -> Result<ExecutionReport, CascadeError> {
    info!(
        event = "core.cascade.delete_started",
        load_balancer_id = load_balancer_id,
        dry_run = options.dry_run
    );

    let raw_id = load_balancer_id;
    let load_balancer_id = raw_id.trim();
    if load_balancer_id.is_empty() {
        error!(event = "core.cascade.invalid_target", id = ?raw_id);
        return Err(CascadeError::InvalidTarget {
            id: raw_id.to_string(),
        });
    }

    let plan = discovery::discover(directory, load_balancer_id, observer).map_err(|e| {
        error!(
            event = "core.cascade.delete_failed",
            stage = "discovery",
            load_balancer_id = load_balancer_id,
            error = %e
        );
        CascadeError::from(e)
    })?;

    let report = execution::execute(directory, &plan, options, observer).map_err(|e| {
        error!(
            event = "core.cascade.delete_failed",
            stage = "execution",
            load_balancer_id = load_balancer_id,
            error = %e
        );
        CascadeError::from(e)
    })?;

    info!(
        event = "core.cascade.delete_completed",
        load_balancer_id = load_balancer_id,
        dry_run = options.dry_run,
        tasks = report.completed.len()
    );

    Ok(report)
}
