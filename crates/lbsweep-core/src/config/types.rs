//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [directory]
//! inventory = "inventory.json"
//!
//! [report]
//! show_members = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SweepConfig {
    /// Where resources are listed and deleted
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Console reporting preferences
    #[serde(default)]
    pub report: ReportConfig,
}

/// Resource Directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DirectoryConfig {
    /// Inventory snapshot to operate on. Relative paths are resolved
    /// against the directory holding the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,
}

/// Console reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReportConfig {
    /// Print discovered members in the trace.
    /// Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_members: Option<bool>,
}

impl ReportConfig {
    pub fn show_members(&self) -> bool {
        self.show_members
            .unwrap_or(super::defaults::DEFAULT_SHOW_MEMBERS)
    }
}
