// Cp command

use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::{report, target_path};
use crate::shell::context::CommandContext;
use crate::vfs::WriteMode;

pub struct CpCommand;

impl Executable for CpCommand {
    fn description(&self) -> &'static str {
        "Copy files: cp SOURCE DEST, or cp SOURCE... DIRECTORY"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let mut sources = ctx.args.clone();
        let Some(dest) = sources.pop() else {
            bail!("missing file operand");
        };
        if sources.is_empty() {
            bail!("missing destination file operand after '{}'", dest);
        }

        let into_dir = ctx.fs.is_directory(&dest, &ctx.cwd);
        if sources.len() > 1 && !into_dir {
            bail!("target '{}' is not a directory", dest);
        }

        let mut code = 0;
        for source in &sources {
            let target = target_path(source, &dest, into_dir);
            let copied = match ctx.fs.read_file(source, &ctx.cwd) {
                Ok(content) => ctx.fs.write_file(&target, &content, &ctx.cwd, WriteMode::Overwrite),
                Err(e) => Err(e),
            };
            if let Err(e) = copied {
                report(ctx, "cp", e);
                code = 1;
            }
        }
        Ok(code)
    }
}
