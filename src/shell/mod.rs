//! The interpreter: pipeline parsing, redirection, command units and completion.

pub mod ast;
pub mod commands;
pub mod completion;
pub mod context;
pub mod error;
pub mod executor;
pub mod parser;
pub mod redirect;
pub mod stream;

pub use completion::{Completion, complete};
pub use context::ShellContext;
pub use error::ShellError;
pub use executor::run_command_line;
pub use stream::Stream;
