use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

pub struct HelpCommand;

impl Executable for HelpCommand {
    fn description(&self) -> &'static str {
        "List available commands"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let path_dir = ctx.var("PATH").unwrap_or("/").to_string();
        let mut output = String::from("Available commands:\n\n");

        for name in ctx.registry.command_names(ctx.fs, &path_dir) {
            // Units naming an unknown implementation are skipped.
            if let Some(description) = ctx.registry.describe(ctx.fs, &path_dir, &name) {
                output.push_str(&format!("  {:<15} {}\n", name, description));
            }
        }

        output.push_str("\nType help to see this list again.\n");
        ctx.stdout.write(&output);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_help_lists_installed_units() {
        let mut shell = TestShell::new();
        let out = shell.run("help").stdout;
        assert!(out.starts_with("Available commands:\n"));
        assert!(out.contains("  ls              List directory contents\n"));

        shell.run("rm /home/guest/.local/bin/ls.cmd");
        assert!(!shell.run("help").stdout.contains("  ls "));
    }
}
