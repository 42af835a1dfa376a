use crate::errors::SweepError;
use crate::resources::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: ResourceKind, id: String },

    #[error("{kind} '{id}' is in use: {message}")]
    Conflict {
        kind: ResourceKind,
        id: String,
        message: String,
    },

    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("{kind} resources cannot be deleted through the directory")]
    Unsupported { kind: ResourceKind },

    #[error("Failed to read inventory '{path}': {source}")]
    InventoryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory '{path}': {message}")]
    InventoryParse { path: String, message: String },
}

impl DirectoryError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        DirectoryError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn conflict(kind: ResourceKind, id: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::Conflict {
            kind,
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        DirectoryError::Transport {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }
}

impl SweepError for DirectoryError {
    fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound { .. } => "DIRECTORY_NOT_FOUND",
            DirectoryError::Conflict { .. } => "DIRECTORY_CONFLICT",
            DirectoryError::Unauthorized { .. } => "DIRECTORY_UNAUTHORIZED",
            DirectoryError::Transport { .. } => "DIRECTORY_TRANSPORT",
            DirectoryError::Unsupported { .. } => "DIRECTORY_UNSUPPORTED",
            DirectoryError::InventoryIo { .. } => "DIRECTORY_INVENTORY_IO",
            DirectoryError::InventoryParse { .. } => "DIRECTORY_INVENTORY_PARSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            DirectoryError::Unauthorized { .. }
                | DirectoryError::InventoryIo { .. }
                | DirectoryError::InventoryParse { .. }
        )
    }
}
