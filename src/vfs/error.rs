use thiserror::Error;

/// Failures of path-qualified filesystem operations.
///
/// Each variant carries the path as the caller wrote it so messages read
/// like the shell's own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{0}: No such file or directory")]
    NotFound(String),
    #[error("{0}: Not a directory")]
    NotADirectory(String),
    #[error("{0}: Is a directory")]
    IsADirectory(String),
    #[error("{0}: File exists")]
    AlreadyExists(String),
    #[error("{0}: Parent directory not found or is not a directory")]
    ParentMissing(String),
    #[error("{0}: Directory not empty")]
    DirectoryNotEmpty(String),
    #[error("cannot remove root directory '/'")]
    RootRemoval,
    #[error("cannot move '{0}' into itself")]
    InvalidMove(String),
}
