use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use lbsweep_core::events;
use lbsweep_core::resources::LoadBalancer;

use super::helpers::{load_config_with_warning, open_directory};

#[derive(Serialize)]
struct LoadBalancerSummary {
    #[serde(flatten)]
    load_balancer: LoadBalancer,
    listeners: usize,
}

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.list_started", json_output = json_output);

    let config = load_config_with_warning();
    let directory = match open_directory(matches, &config) {
        Ok((directory, _)) => directory,
        Err(e) => {
            eprintln!("❌ Failed to list load balancers: {}", e);

            error!(
                event = "cli.list_failed",
                error = %e
            );

            events::log_app_error(&*e);
            return Err(e);
        }
    };

    let load_balancers = directory.list_load_balancers();
    let count = load_balancers.len();

    if json_output {
        let summaries: Vec<LoadBalancerSummary> = load_balancers
            .into_iter()
            .map(|(load_balancer, listeners)| LoadBalancerSummary {
                load_balancer,
                listeners,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else if load_balancers.is_empty() {
        println!("No load balancers found.");
    } else {
        let id_width = load_balancers
            .iter()
            .map(|(lb, _)| lb.id.len())
            .max()
            .unwrap_or(0)
            .max("ID".len());
        println!("{:<id_width$}  {:<9}  NAME", "ID", "LISTENERS");
        for (lb, listeners) in &load_balancers {
            println!(
                "{:<id_width$}  {:<9}  {}",
                lb.id,
                listeners,
                lb.name.as_deref().unwrap_or("-")
            );
        }
    }

    info!(event = "cli.list_completed", count = count);

    Ok(())
}
