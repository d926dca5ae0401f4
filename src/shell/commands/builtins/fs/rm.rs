// Rm command

use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::report;
use crate::shell::context::CommandContext;

pub struct RmCommand;

impl Executable for RmCommand {
    fn description(&self) -> &'static str {
        "Remove files or directories (-r recursive, -f ignore errors)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        if ctx.args.is_empty() {
            bail!("missing operand");
        }
        let recursive = ctx.options.has("r") || ctx.options.has("R");
        let force = ctx.options.has("f") || ctx.options.has("force");
        let mut code = 0;

        for path in ctx.args.clone() {
            if path == "/" || path == "." {
                report(ctx, "rm", format!("cannot remove '{}': Is a special file", path));
                code = 1;
                continue;
            }
            if let Err(e) = ctx.fs.delete(&path, recursive, &ctx.cwd) {
                // -f hides the message, not the failure.
                if !force {
                    report(ctx, "rm", format!("cannot remove '{}': {}", path, e));
                }
                code = 1;
            }
        }
        Ok(code)
    }
}
