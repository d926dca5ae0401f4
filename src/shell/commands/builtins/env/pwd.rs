use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

pub struct PwdCommand;

impl Executable for PwdCommand {
    fn description(&self) -> &'static str {
        "Print working directory"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        ctx.stdout.write(&format!("{}\n", ctx.cwd));
        Ok(0)
    }
}
