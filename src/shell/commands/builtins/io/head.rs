use anyhow::{Context, Result, bail};

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::read_inputs;
use crate::shell::context::CommandContext;

const DEFAULT_LINES: usize = 10;

/// Split `-n N` off the positional arguments.
///
/// A bare `-n` takes its count from the first positional argument.
/// `-nN` and `--lines=N` are accepted as well.
fn line_count(ctx: &CommandContext<'_>) -> Result<(usize, Vec<String>)> {
    let mut files = ctx.args.clone();
    if let Some(value) = ctx.options.value("lines").or_else(|| ctx.options.value("n")) {
        let n = value
            .parse::<usize>()
            .with_context(|| format!("invalid number of lines: '{}'", value))?;
        return Ok((n, files));
    }
    if ctx.options.has("n") {
        if files.is_empty() {
            bail!("option requires an argument -- 'n'");
        }
        let value = files.remove(0);
        let n = value
            .parse::<usize>()
            .with_context(|| format!("invalid number of lines: '{}'", value))?;
        return Ok((n, files));
    }
    Ok((DEFAULT_LINES, files))
}

fn run(ctx: &mut CommandContext<'_>, name: &str, from_end: bool) -> Result<i32> {
    let (n, files) = line_count(ctx)?;
    let (contents, code) = read_inputs(ctx, name, &files);

    for content in contents {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let picked = if from_end {
            &lines[lines.len().saturating_sub(n)..]
        } else {
            &lines[..n.min(lines.len())]
        };
        ctx.stdout.write(&picked.concat());
    }
    Ok(code)
}

pub struct HeadCommand;

impl Executable for HeadCommand {
    fn description(&self) -> &'static str {
        "Output the first lines of files or stdin (-n N)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        run(ctx, "head", false)
    }
}

pub struct TailCommand;

impl Executable for TailCommand {
    fn description(&self) -> &'static str {
        "Output the last lines of files or stdin (-n N)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        run(ctx, "tail", true)
    }
}
