use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

/// Erase display and move the cursor home.
pub const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[H";

pub struct ClearCommand;

impl Executable for ClearCommand {
    fn description(&self) -> &'static str {
        "Clear terminal output"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        ctx.stdout.write(CLEAR_SEQUENCE);
        Ok(0)
    }
}
