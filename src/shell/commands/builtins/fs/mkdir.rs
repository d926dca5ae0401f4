// Mkdir command

use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::report;
use crate::shell::context::CommandContext;

pub struct MkdirCommand;

impl Executable for MkdirCommand {
    fn description(&self) -> &'static str {
        "Create directories (-p creates missing parents)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        if ctx.args.is_empty() {
            bail!("missing operand");
        }
        let parents = ctx.options.has("p");
        let mut code = 0;

        for dir in ctx.args.clone() {
            let result = if parents {
                ctx.fs.create_dir_all(&dir, &ctx.cwd)
            } else {
                ctx.fs.create_directory(&dir, &ctx.cwd)
            };
            if let Err(e) = result {
                report(ctx, "mkdir", format!("cannot create directory '{}': {}", dir, e));
                code = 1;
            }
        }
        Ok(code)
    }
}
