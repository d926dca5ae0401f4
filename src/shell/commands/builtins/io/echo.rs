// Echo command

use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;

pub struct EchoCommand;

impl EchoCommand {
    fn unescape(text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                output.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => output.push('\n'),
                Some('t') => output.push('\t'),
                Some('r') => output.push('\r'),
                Some('\\') => output.push('\\'),
                Some('"') => output.push('"'),
                Some('\'') => output.push('\''),
                Some(other) => {
                    output.push('\\');
                    output.push(other);
                }
                None => output.push('\\'),
            }
        }
        output
    }
}

impl Executable for EchoCommand {
    fn description(&self) -> &'static str {
        "Display a line of text (-n no newline, -e interpret escapes)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let mut output = ctx.args.join(" ");
        if !ctx.options.has("n") {
            output.push('\n');
        }
        if ctx.options.has("e") {
            output = Self::unescape(&output);
        }
        ctx.stdout.write(&output);
        Ok(0)
    }
}
