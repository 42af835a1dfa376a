use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, warn};

use lbsweep_core::{InventoryDirectory, SweepConfig};

/// Load configuration, falling back to defaults with a warning on stderr.
pub fn load_config_with_warning() -> SweepConfig {
    match SweepConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.lbsweep/config.toml and ./.lbsweep/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            SweepConfig::default()
        }
    }
}

/// Inventory path from `--inventory`, else from config.
pub fn resolve_inventory_path(
    matches: &ArgMatches,
    config: &SweepConfig,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = matches.get_one::<PathBuf>("inventory") {
        return Ok(path.clone());
    }

    config.directory.inventory.clone().ok_or_else(|| {
        error!(event = "cli.inventory_unset");
        "No inventory configured. Pass --inventory <PATH> or set [directory] inventory in ~/.lbsweep/config.toml"
            .into()
    })
}

/// Open the inventory directory selected by flags and config.
pub fn open_directory(
    matches: &ArgMatches,
    config: &SweepConfig,
) -> Result<(InventoryDirectory, PathBuf), Box<dyn std::error::Error>> {
    let path = resolve_inventory_path(matches, config)?;
    let directory = InventoryDirectory::load(&path)?;
    Ok((directory, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;
    use lbsweep_core::config::DirectoryConfig;

    fn list_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["lbsweep", "list"];
        argv.extend_from_slice(args);
        build_cli()
            .try_get_matches_from(argv)
            .unwrap()
            .subcommand_matches("list")
            .unwrap()
            .clone()
    }

    fn config_with_inventory(path: &str) -> SweepConfig {
        SweepConfig {
            directory: DirectoryConfig {
                inventory: Some(PathBuf::from(path)),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_flag_overrides_config() {
        let matches = list_matches(&["--inventory", "/tmp/flag.json"]);
        let config = config_with_inventory("/tmp/config.json");

        let path = resolve_inventory_path(&matches, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.json"));
    }

    #[test]
    fn test_config_used_without_flag() {
        let matches = list_matches(&[]);
        let config = config_with_inventory("/tmp/config.json");

        let path = resolve_inventory_path(&matches, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/config.json"));
    }

    #[test]
    fn test_missing_inventory_is_an_error() {
        let matches = list_matches(&[]);
        let error = resolve_inventory_path(&matches, &SweepConfig::default()).unwrap_err();
        assert!(error.to_string().contains("--inventory"));
    }
}
