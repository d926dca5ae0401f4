// Mv command

use anyhow::{Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::{report, target_path};
use crate::shell::context::CommandContext;

pub struct MvCommand;

impl Executable for MvCommand {
    fn description(&self) -> &'static str {
        "Move or rename files: mv SOURCE DEST, or mv SOURCE... DIRECTORY"
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
            if let Err(e) = ctx.fs.rename(source, &target, &ctx.cwd) {
                report(ctx, "mv", e);
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
    fn test_mv_rename_and_into_directory() {
        let mut shell = TestShell::new();
        shell.fs_write("/a", "1");
        shell.fs_mkdir("/dir");

        assert_eq!(shell.run("mv /a /b").code, 0);
        assert!(!shell.exists("/a"));
        assert_eq!(shell.read("/b"), "1");

        assert_eq!(shell.run("mv /b /dir").code, 0);
        assert_eq!(shell.read("/dir/b"), "1");
    }

    #[test]
    fn test_mv_directory_into_itself() {
        let mut shell = TestShell::new();
        shell.fs_mkdir("/dir");
        shell.fs_mkdir("/dir/sub");
        let result = shell.run("mv /dir /dir/sub");
        assert_eq!(result.code, 1);
        assert_eq!(result.stderr, "mv: cannot move '/dir' into itself\n");
        assert!(shell.is_dir("/dir/sub"));
    }
}
