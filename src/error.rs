use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("no such file or directory")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Unit {0}.service not found.")]
    NotFound(String),
    #[error("{0}.service is already active")]
    AlreadyActive(String),
    #[error("{0}.service is already inactive")]
    AlreadyInactive(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("malformed stored value: {0}")]
    Serde(#[from] serde_json::Error),
}
