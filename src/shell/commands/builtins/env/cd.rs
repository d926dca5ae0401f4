// Cd command

use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;
use crate::shell::error::ShellError;
use crate::vfs::VPath;

pub struct CdCommand;

impl Executable for CdCommand {
    fn description(&self) -> &'static str {
        "Change the working directory (restricted to the home directory)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let target = match ctx.args.first() {
            Some(path) => path.clone(),
            None => ctx.home().to_string(),
        };

        let resolved = VPath::resolve(&target, &ctx.cwd);
        if !ctx.fs.is_directory(&resolved.to_string(), "/") {
            bail!("{}: No such file or directory", target);
        }

        let home = VPath::resolve(ctx.home(), "/");
        if !resolved.starts_with(&home) {
            return Err(ShellError::PermissionDenied(format!(
                "permission denied: {} (Restricted to home directory)",
                target
            ))
            .into());
        }

        ctx.cwd = resolved.to_string();
        Ok(0)
    }
}
