use thiserror::Error;

use crate::vfs::FsError;

/// Interpreter failures that abort a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("{fd}>&{target}: Bad file descriptor")]
    BadFileDescriptor { fd: u32, target: String },
    #[error("syntax error near unexpected token `{0}'")]
    MissingRedirectTarget(String),
    #[error("{0}: redirection not supported")]
    UnsupportedRedirection(String),
    #[error("{0}: command not found")]
    CommandNotFound(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("vsh: {0}")]
    Io(#[from] FsError),
}

impl ShellError {
    /// Exit code reported for a stage that failed this way.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound(_) => 127,
            _ => 1,
        }
    }
}
