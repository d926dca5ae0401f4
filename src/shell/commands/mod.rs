pub mod builtins;
pub mod registry;

use crate::shell::context::CommandContext;
use anyhow::Result;

/// A command unit: the behaviour a unit file in the command directory names.
pub trait Executable: Send + Sync {
    /// One line shown by `help`.
    fn description(&self) -> &'static str;

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32>;
}
