use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::{format_timestamp, report};
use crate::shell::context::CommandContext;

pub struct StatCommand;

impl Executable for StatCommand {
    fn description(&self) -> &'static str {
        "Display file or directory status"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        if ctx.args.is_empty() {
            bail!("missing operand");
        }
        let mut code = 0;
        for path in &ctx.args {
            match ctx.fs.stat(path, &ctx.cwd) {
                Ok(stat) => ctx.stdout.write(&format!(
                    "  File: {}\n  Type: {}\n  Size: {}\nAccess: {}\nModify: {}\nCreate: {}\n",
                    path,
                    stat.node_type,
                    stat.size,
                    stat.permissions,
                    format_timestamp(stat.modified_at),
                    format_timestamp(stat.created_at),
                )),
                Err(e) => {
                    report(ctx, "stat", format!("cannot stat '{}': {}", path, e));
                    code = 1;
                }
            }
        }
        Ok(code)
    }
}
