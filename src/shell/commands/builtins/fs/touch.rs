use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::report;
use crate::shell::context::CommandContext;
use crate::vfs::WriteMode;

pub struct TouchCommand;

impl Executable for TouchCommand {
    fn description(&self) -> &'static str {
        "Create an empty file or update its timestamp"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        if ctx.args.is_empty() {
            bail!("missing file operand");
        }
        let mut code = 0;
        for file in ctx.args.clone() {
            // Appending nothing creates the file or bumps modified_at.
            if let Err(e) = ctx.fs.write_file(&file, "", &ctx.cwd, WriteMode::Append) {
                report(ctx, "touch", format!("cannot touch '{}': {}", file, e));
                code = 1;
            }
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_touch_keeps_content() {
        let mut shell = TestShell::new();
        shell.fs_write("/f", "keep");
        assert_eq!(shell.run("touch /f /g").code, 0);
        assert_eq!(shell.read("/f"), "keep");
        assert_eq!(shell.read("/g"), "");
        assert_eq!(shell.run("touch /missing/f").code, 1);
    }
}
