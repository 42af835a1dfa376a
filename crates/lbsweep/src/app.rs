use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("lbsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tear down a load balancer and everything attached to it")
        .long_about("lbsweep deletes a load balancer together with its listeners, pools and health monitors, children first. Runs are dry by default: the plan is printed and nothing is deleted until --no-dry-run is given.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("delete")
                .about("Delete a load balancer and its dependent resources")
                .arg(
                    Arg::new("loadbalancer")
                        .help("ID of the load balancer to delete")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("no-dry-run")
                        .long("no-dry-run")
                        .help("Actually delete resources instead of printing the plan")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the execution report in JSON format")
                        .action(ArgAction::SetTrue)
                )
                .arg(inventory_arg())
        )
        .subcommand(
            Command::new("list")
                .about("List known load balancers")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
                .arg(inventory_arg())
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(clap_complete::Shell))
                )
        )
}

fn inventory_arg() -> Arg {
    Arg::new("inventory")
        .long("inventory")
        .short('i')
        .help("Inventory snapshot to operate on (overrides config)")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}
