// Ps command

use anyhow::Result;
use chrono::Utc;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

pub struct PsCommand;

impl Executable for PsCommand {
    fn description(&self) -> &'static str {
        "Report a snapshot of the current processes"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        // The shell and ps itself are the only processes there are.
        let pid = Utc::now().timestamp_millis().rem_euclid(9999);

        if !ctx.args.is_empty() || !ctx.options.is_empty() {
            ctx.stderr.write("ps: Operation not permitted\n");
            ctx.stderr.write("ps: vsh runs every command in a single process\n");
            return Ok(1);
        }

        ctx.stdout.write("  PID TTY          TIME CMD\n");
        ctx.stdout.write(&format!("{:>5} pts/0    00:00:01 vsh\n", pid));
        ctx.stdout.write(&format!("{:>5} pts/0    00:00:00 ps\n", (pid + 1) % 9999));
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_ps_lists_shell() {
        let mut shell = TestShell::new();
        let result = shell.run("ps");
        assert_eq!(result.code, 0);
        let lines: Vec<&str> = result.stdout.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  PID TTY          TIME CMD");
        assert!(lines[1].ends_with(" pts/0    00:00:01 vsh"));
        assert!(lines[2].ends_with(" pts/0    00:00:00 ps"));
    }

    #[test]
    fn test_ps_rejects_options() {
        let mut shell = TestShell::new();
        let result = shell.run("ps aux");
        assert_eq!(result.code, 1);
        assert!(result.stderr.starts_with("ps: Operation not permitted\n"));
        assert_eq!(shell.run("ps -e").code, 1);
    }
}
