//! lbsweep-core: cascading teardown of a load balancer and its dependents
//!
//! Given one load balancer id, the orchestrator walks listeners, pools,
//! health monitors and members through a [`ResourceDirectory`], builds a
//! bottom-up deletion plan and executes it sequentially. Dry run is the
//! default.
//!
//! # Main Entry Points
//!
//! - [`cascade`] - Discovery, execution and reporting
//! - [`directory`] - The directory contract and the inventory-backed directory
//! - [`config`] - Configuration management

pub mod cascade;
pub mod config;
pub mod directory;
pub mod errors;
pub mod events;
pub mod logging;
pub mod resources;

// Re-export commonly used types at crate root for convenience
pub use cascade::{
    CascadeError, CascadeObserver, CascadeOptions, DeletionError, DeletionPlan, DeletionTask,
    DiscoveryError, ExecutionReport, TaskOutcome, cascade_delete,
};
pub use config::SweepConfig;
pub use directory::{DirectoryError, InventoryDirectory, ResourceDirectory};
pub use errors::SweepError;
pub use resources::ResourceKind;

// Re-export logging initialization
pub use logging::init_logging;
