pub mod discovery;
pub mod errors;
pub mod execution;
pub mod handler;
pub mod observer;
pub mod types;

// Public API exports
pub use discovery::discover;
pub use errors::{CascadeError, DeletionError, DiscoveryError};
pub use execution::execute;
pub use handler::cascade_delete;
pub use observer::{CascadeObserver, NoopObserver, TracingObserver, describe_outcome};
pub use types::{
    CascadeOptions, CompletedTask, DeletionPlan, DeletionTask, ExecutionReport, ListenerNode,
    LoadBalancerTree, PoolNode, TaskOutcome,
};
