use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::read_inputs;
use crate::shell::context::CommandContext;

pub struct WcCommand;

impl Executable for WcCommand {
    fn description(&self) -> &'static str {
        "Count lines, words and bytes (-l, -w, -c select columns)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let (contents, code) = read_inputs(ctx, "wc", &ctx.args);
        let text = contents.concat();

        let counts = [
            ("l", text.matches('\n').count()),
            ("w", text.split_whitespace().count()),
            ("c", text.len()),
        ];
        let selected: Vec<String> = if ["l", "w", "c"].iter().any(|o| ctx.options.has(o)) {
            counts
                .iter()
                .filter(|(opt, _)| ctx.options.has(opt))
                .map(|(_, n)| n.to_string())
                .collect()
        } else {
            counts.iter().map(|(_, n)| n.to_string()).collect()
        };

        ctx.stdout.write(&format!("{}\n", selected.join(" ")));
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_wc_counts() {
        let mut shell = TestShell::new();
        shell.fs_write("/f", "one two\nthree\n");
        assert_eq!(shell.run("wc /f").stdout, "2 3 14\n");
        assert_eq!(shell.run("cat /f | wc -l").stdout, "2\n");
        assert_eq!(shell.run("wc -wc /f").stdout, "3 14\n");
    }
}
