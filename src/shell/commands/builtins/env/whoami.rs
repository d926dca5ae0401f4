use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

pub struct WhoamiCommand;

impl Executable for WhoamiCommand {
    fn description(&self) -> &'static str {
        "Print user identity (the home directory's about.md when present)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let about = format!("{}/about.md", ctx.home());
        let output = match ctx.fs.read_file(&about, "/") {
            Ok(content) if !content.is_empty() => content,
            _ => ctx.var("USER").unwrap_or("guest").to_string(),
        };
        ctx.stdout.write(&output);
        if !output.ends_with('\n') {
            ctx.stdout.write("\n");
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_whoami_prefers_about_file() {
        let mut shell = TestShell::new();
        assert!(shell.run("whoami").stdout.starts_with("# guest\n"));

        shell.run("rm /home/guest/about.md");
        assert_eq!(shell.run("whoami").stdout, "guest\n");
        // Built-in alias.
        assert_eq!(shell.run("aboutme").stdout, "guest\n");
    }
}
