//! Default values for configuration types.

/// File name looked up inside each config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the home and project roots
pub const CONFIG_DIR_NAME: &str = ".lbsweep";

/// Members are printed unless turned off
pub const DEFAULT_SHOW_MEMBERS: bool = true;
