use anyhow::{Context, Result, bail};
use regex::RegexBuilder;

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::read_inputs;
use crate::shell::context::CommandContext;

pub struct GrepCommand;

impl Executable for GrepCommand {
    fn description(&self) -> &'static str {
        "Print lines matching a pattern (-i ignore case, -v invert)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let Some((pattern, files)) = ctx.args.split_first() else {
            bail!("usage: grep [-i] [-v] PATTERN [FILE]...");
        };
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ctx.options.has("i"))
            .build()
            .with_context(|| format!("invalid pattern '{}'", pattern))?;
        let invert = ctx.options.has("v");

        let (contents, mut code) = read_inputs(ctx, "grep", files);
        let mut matched = false;
        for content in contents {
            for line in content.lines() {
                if regex.is_match(line) != invert {
                    ctx.stdout.write(&format!("{}\n", line));
                    matched = true;
                }
            }
        }

        // Like grep(1): 1 when nothing matched, unless a file already failed.
        if !matched && code == 0 {
            code = 1;
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::TestShell;

    #[test]
    fn test_grep_filters_lines() {
        let mut shell = TestShell::new();
        shell.fs_write("/f", "apple\nBanana\ncherry\n");
        assert_eq!(shell.run("grep an /f").stdout, "Banana\n");
        assert_eq!(shell.run("grep -i ^b /f").stdout, "Banana\n");
        assert_eq!(shell.run("cat /f | grep -v a").stdout, "cherry\n");
    }

    #[test]
    fn test_grep_no_match_and_bad_pattern() {
        let mut shell = TestShell::new();
        shell.fs_write("/f", "x\n");
        let result = shell.run("grep y /f");
        assert_eq!(result.code, 1);
        assert_eq!(result.stdout, "");

        let result = shell.run("grep '(' /f");
        assert_eq!(result.code, 1);
        assert!(result.stderr.starts_with("grep: invalid pattern '('"));
    }
}
