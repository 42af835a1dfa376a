//! Resource Directory: the remote control plane as seen by the orchestrator.
//!
//! The orchestrator only needs list-by-parent and delete-by-id. How listings
//! are paginated or authenticated belongs to the implementation.

pub mod errors;
pub mod inventory;
pub mod traits;

pub use errors::DirectoryError;
pub use inventory::{
    Inventory, InventoryDirectory, ListenerRecord, LoadBalancerRecord, PoolRecord,
};
pub use traits::ResourceDirectory;
