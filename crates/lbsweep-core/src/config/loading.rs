//! Configuration loading and merging logic.
//!
//! Missing config files are expected and skipped. A file that exists but
//! does not parse is an error.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::config::types::{DirectoryConfig, ReportConfig, SweepConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from `~/.lbsweep/config.toml` and
/// `./.lbsweep/config.toml`, project values winning.
pub fn load_hierarchy() -> Result<SweepConfig, ConfigError> {
    let user_dir = dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME));
    let project_dir = std::env::current_dir()?.join(CONFIG_DIR_NAME);
    load_from_dirs(user_dir.as_deref(), &project_dir)
}

/// Load and merge the config files found in the given directories.
pub fn load_from_dirs(
    user_dir: Option<&Path>,
    project_dir: &Path,
) -> Result<SweepConfig, ConfigError> {
    let mut config = SweepConfig::default();

    if let Some(user_dir) = user_dir
        && let Some(user_config) = load_config_file(user_dir)?
    {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) = load_config_file(project_dir)? {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load `config.toml` from `dir`, or `None` if it does not exist.
fn load_config_file(dir: &Path) -> Result<Option<SweepConfig>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "core.config.file_missing", path = %path.display());
            return Ok(None);
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let mut config: SweepConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    // Relative inventory paths are relative to the config file, not the cwd
    if let Some(inventory) = config.directory.inventory.take() {
        let resolve = inventory.is_relative() && !inventory.as_os_str().is_empty();
        config.directory.inventory = Some(if resolve {
            dir.join(inventory)
        } else {
            inventory
        });
    }

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields in the override replace base values only if present.
pub fn merge_configs(base: SweepConfig, override_config: SweepConfig) -> SweepConfig {
    SweepConfig {
        directory: DirectoryConfig {
            inventory: override_config
                .directory
                .inventory
                .or(base.directory.inventory),
        },
        report: ReportConfig {
            show_members: override_config
                .report
                .show_members
                .or(base.report.show_members),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(dir: &Path, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config =
            load_from_dirs(Some(&temp_dir.path().join("user")), &temp_dir.path().join("project"))
                .unwrap();
        assert_eq!(config, SweepConfig::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let user_dir = temp_dir.path().join("user");
        let project_dir = temp_dir.path().join("project");
        write_config(
            &user_dir,
            "[directory]\ninventory = \"/srv/user.json\"\n\n[report]\nshow_members = false\n",
        );
        write_config(&project_dir, "[directory]\ninventory = \"/srv/project.json\"\n");

        let config = load_from_dirs(Some(&user_dir), &project_dir).unwrap();
        assert_eq!(
            config.directory.inventory,
            Some(PathBuf::from("/srv/project.json"))
        );
        assert!(!config.report.show_members());
    }

    #[test]
    fn test_relative_inventory_resolves_against_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join("project");
        write_config(&project_dir, "[directory]\ninventory = \"inventory.json\"\n");

        let config = load_from_dirs(None, &project_dir).unwrap();
        assert_eq!(
            config.directory.inventory,
            Some(project_dir.join("inventory.json"))
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join("project");
        write_config(&project_dir, "invalid toml [[[");

        let result = load_from_dirs(None, &project_dir);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_merge_keeps_base_when_override_empty() {
        let base = SweepConfig {
            directory: DirectoryConfig {
                inventory: Some(PathBuf::from("/srv/base.json")),
            },
            report: ReportConfig {
                show_members: Some(false),
            },
        };
        let merged = merge_configs(base.clone(), SweepConfig::default());
        assert_eq!(merged, base);
    }
}
