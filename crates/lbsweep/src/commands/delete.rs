use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use lbsweep_core::cascade::{
    CompletedTask, TracingObserver, cascade_delete, describe_outcome,
};
use lbsweep_core::directory::DirectoryError;
use lbsweep_core::{
    CascadeError, CascadeObserver, CascadeOptions, DeletionPlan, DeletionTask, ExecutionReport,
    ResourceKind, SweepError, TaskOutcome, events,
};

use super::helpers::{load_config_with_warning, open_directory};

/// Prints the discovered tree and each processed task to stdout
struct ConsoleObserver {
    show_members: bool,
    tracing: TracingObserver,
}

impl ConsoleObserver {
    fn new(show_members: bool) -> Self {
        Self {
            show_members,
            tracing: TracingObserver,
        }
    }
}

/// Tree level of a kind, the load balancer being level 0
fn depth(kind: ResourceKind) -> usize {
    std::iter::successors(kind.parent(), |k| k.parent()).count()
}

impl CascadeObserver for ConsoleObserver {
    fn on_discovered(&mut self, kind: ResourceKind, id: &str, parent_id: Option<&str>) {
        self.tracing.on_discovered(kind, id, parent_id);
        if kind == ResourceKind::Member && !self.show_members {
            return;
        }
        println!("{}{} {}", "  ".repeat(depth(kind)), kind.display_name(), id);
    }

    fn on_plan_ready(&mut self, plan: &DeletionPlan) {
        self.tracing.on_plan_ready(plan);
        println!();
        println!(
            "Plan: {} deletion(s), {} member(s) removed with their pools",
            plan.tasks.len(),
            plan.tree.member_count()
        );
    }

    fn on_task_completed(&mut self, completed: &CompletedTask) {
        self.tracing.on_task_completed(completed);
        println!("   {}", describe_outcome(completed));
    }

    fn on_task_failed(&mut self, task: &DeletionTask, error: &DirectoryError) {
        self.tracing.on_task_failed(task, error);
        println!("   failed to delete {}: {}", task, error);
    }
}

/// JSON shape printed with `--json` when the cascade does not finish
#[derive(Serialize)]
struct FailureReport<'a> {
    load_balancer_id: &'a str,
    dry_run: bool,
    error_code: &'static str,
    error: String,
    failed: Option<&'a DeletionTask>,
    completed: &'a [CompletedTask],
    not_attempted: &'a [DeletionTask],
}

impl<'a> FailureReport<'a> {
    fn new(load_balancer_id: &'a str, dry_run: bool, error: &'a CascadeError) -> Self {
        let (failed, completed, not_attempted) = match error {
            CascadeError::Deletion(e) => (
                Some(&e.failed),
                e.completed.as_slice(),
                e.not_attempted.as_slice(),
            ),
            _ => (None, &[] as &[CompletedTask], &[] as &[DeletionTask]),
        };

        Self {
            load_balancer_id,
            dry_run,
            error_code: error.error_code(),
            error: error.to_string(),
            failed,
            completed,
            not_attempted,
        }
    }
}

pub(crate) fn handle_delete_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let load_balancer_id = matches
        .get_one::<String>("loadbalancer")
        .ok_or("Load balancer ID is required")?;
    let json_output = matches.get_flag("json");
    let options = if matches.get_flag("no-dry-run") {
        CascadeOptions::destructive()
    } else {
        CascadeOptions::default()
    };

    info!(
        event = "cli.delete_started",
        load_balancer_id = %load_balancer_id,
        dry_run = options.dry_run,
        json_output = json_output
    );

    let config = load_config_with_warning();
    let (directory, inventory_path) = open_directory(matches, &config).map_err(|e| {
        eprintln!("❌ {}", e);
        error!(event = "cli.delete_failed", stage = "inventory", error = %e);
        e
    })?;

    let result = if json_output {
        cascade_delete(&directory, load_balancer_id, &options, &mut TracingObserver)
    } else {
        if options.dry_run {
            println!("[DRY RUN] Nothing will be deleted.");
        }
        println!();
        let mut observer = ConsoleObserver::new(config.report.show_members());
        cascade_delete(&directory, load_balancer_id, &options, &mut observer)
    };

    // Partial progress is real progress; persist it too
    let mutated = matches!(result, Ok(_) | Err(CascadeError::Deletion(_)));
    let outcome = report_outcome(load_balancer_id, &options, json_output, result);

    if options.dry_run || !mutated {
        return outcome;
    }
    let saved = directory.save(&inventory_path);
    combine_with_save(outcome, saved)
}

/// Print the cascade result; only the error is handed back.
fn report_outcome(
    load_balancer_id: &str,
    options: &CascadeOptions,
    json_output: bool,
    result: Result<ExecutionReport, CascadeError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(report) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }

            info!(
                event = "cli.delete_completed",
                load_balancer_id = %report.load_balancer_id,
                dry_run = report.dry_run,
                tasks = report.completed.len()
            );
            Ok(())
        }
        Err(e) => {
            if json_output {
                let failure = FailureReport::new(load_balancer_id, options.dry_run, &e);
                println!("{}", serde_json::to_string_pretty(&failure)?);
            }
            eprintln!("❌ Failed to delete load balancer '{}': {}", load_balancer_id, e);
            if let CascadeError::Deletion(deletion) = &e
                && !deletion.not_attempted.is_empty()
            {
                eprintln!("   Not attempted:");
                for task in &deletion.not_attempted {
                    eprintln!("      - {}", task);
                }
            }

            error!(
                event = "cli.delete_failed",
                load_balancer_id = %load_balancer_id,
                error = %e
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

/// Fold a failed inventory write into the command result without hiding
/// an earlier cascade failure.
fn combine_with_save(
    outcome: Result<(), Box<dyn std::error::Error>>,
    saved: Result<(), DirectoryError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Err(save_error) = saved else {
        return outcome;
    };

    eprintln!("❌ Remaining inventory was not saved: {}", save_error);
    error!(event = "cli.inventory_save_failed", error = %save_error);
    events::log_app_error(&save_error);

    match outcome {
        Ok(()) => Err(save_error.into()),
        Err(cascade_error) => Err(format!(
            "{}; remaining inventory was not saved: {}",
            cascade_error, save_error
        )
        .into()),
    }
}

fn print_summary(report: &ExecutionReport) {
    println!();
    if report.dry_run {
        println!(
            "[DRY RUN] Would delete {} resource(s). Re-run with --no-dry-run to delete.",
            report.count(TaskOutcome::WouldDelete)
        );
    } else {
        println!(
            "✅ Load balancer '{}' deleted: {} resource(s) deleted, {} already gone",
            report.load_balancer_id,
            report.count(TaskOutcome::Deleted),
            report.count(TaskOutcome::AlreadyAbsent)
        );
    }
}
