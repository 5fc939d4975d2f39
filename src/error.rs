use thiserror::Error;

/// Rejected intents. State is left untouched whenever one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Task title is required")]
    EmptyTitle,
    #[error("Project name is required.")]
    EmptyProjectName,
    #[error("Unknown column {0}")]
    UnknownColumn(u8),
    #[error("Task {0} is not on the board")]
    CardNotFound(String),
    #[error("Project not found")]
    ProjectNotFound(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed {key} document: {reason}")]
    Malformed { key: &'static str, reason: String },
}

/// Anything a command can report back to the view layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Failed to save changes: {0}")]
    Store(#[from] StoreError),
}
