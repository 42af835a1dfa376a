//! # Configuration System
//!
//! Hierarchical TOML configuration for lbsweep.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.lbsweep/config.toml`
//! 3. **Project config** - `./.lbsweep/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.lbsweep/config.toml
//! [directory]
//! inventory = "/var/lib/lbsweep/inventory.json"
//!
//! [report]
//! show_members = false
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{DirectoryConfig, ReportConfig, SweepConfig};
pub use validation::validate_config;

impl SweepConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
