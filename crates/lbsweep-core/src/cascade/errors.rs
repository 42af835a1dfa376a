use crate::cascade::types::{CompletedTask, DeletionTask};
use crate::directory::DirectoryError;
use crate::errors::SweepError;
use crate::resources::ResourceKind;

/// Discovery could not produce a complete plan. Nothing was deleted.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to list {child_kind} resources of {parent_kind} '{parent_id}': {source}")]
    ListingFailed {
        parent_kind: ResourceKind,
        parent_id: String,
        child_kind: ResourceKind,
        #[source]
        source: DirectoryError,
    },

    #[error(
        "{kind} '{id}' is listed under both '{first_parent}' and '{second_parent}'; refusing to plan an ambiguous tree"
    )]
    DuplicateResource {
        kind: ResourceKind,
        id: String,
        first_parent: String,
        second_parent: String,
    },
}

impl SweepError for DiscoveryError {
    fn error_code(&self) -> &'static str {
        match self {
            DiscoveryError::ListingFailed { .. } => "DISCOVERY_LISTING_FAILED",
            DiscoveryError::DuplicateResource { .. } => "DISCOVERY_DUPLICATE_RESOURCE",
        }
    }
}

/// A delete call failed; the rest of the plan was abandoned.
#[derive(Debug, thiserror::Error)]
#[error(
    "Failed to delete {} '{}' ({} completed, {} not attempted): {}",
    .failed.kind,
    .failed.id,
    .completed.len(),
    .not_attempted.len(),
    .source
)]
pub struct DeletionError {
    pub failed: DeletionTask,
    #[source]
    pub source: DirectoryError,
    pub completed: Vec<CompletedTask>,
    pub not_attempted: Vec<DeletionTask>,
}

impl SweepError for DeletionError {
    fn error_code(&self) -> &'static str {
        "DELETION_FAILED"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("Invalid load balancer id '{id}': must not be empty")]
    InvalidTarget { id: String },

    #[error("Discovery failed, nothing was deleted: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Cascade halted: {0}")]
    Deletion(#[from] DeletionError),
}

impl SweepError for CascadeError {
    fn error_code(&self) -> &'static str {
        match self {
            CascadeError::InvalidTarget { .. } => "CASCADE_INVALID_TARGET",
            CascadeError::Discovery(e) => e.error_code(),
            CascadeError::Deletion(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, CascadeError::InvalidTarget { .. })
    }
}
