use crate::config::types::SweepConfig;
use crate::errors::ConfigError;

/// Validate the configuration.
pub fn validate_config(config: &SweepConfig) -> Result<(), ConfigError> {
    if let Some(inventory) = &config.directory.inventory
        && inventory.as_os_str().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "directory.inventory must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DirectoryConfig;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SweepConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_inventory_path_is_rejected() {
        let config = SweepConfig {
            directory: DirectoryConfig {
                inventory: Some(PathBuf::new()),
            },
            ..Default::default()
        };
        let error = validate_config(&config).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid configuration: directory.inventory must not be empty"
        );
    }
}
