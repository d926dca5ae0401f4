// Cat command

use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::read_inputs;
use crate::shell::context::CommandContext;

pub struct CatCommand;

impl Executable for CatCommand {
    fn description(&self) -> &'static str {
        "Concatenate files (or stdin) and print on the standard output"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let (contents, code) = read_inputs(ctx, "cat", &ctx.args);
        for content in contents {
            ctx.stdout.write(&content);
        }
        Ok(code)
    }
}
