// Ls command

use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::common::{format_timestamp, report};
use crate::shell::context::CommandContext;
use crate::vfs::{NodeType, Stat, VPath};

pub struct LsCommand;

impl LsCommand {
    fn long_line(ctx: &CommandContext<'_>, stat: &Stat, name: &str) -> String {
        let user = ctx.var("USER").unwrap_or("user");
        let suffix = if stat.node_type == NodeType::Directory { "/" } else { "" };
        format!(
            "{} 1 {} {} {:>8} {} {}{}\n",
            stat.permissions,
            user,
            user,
            stat.size,
            format_timestamp(stat.modified_at),
            name,
            suffix
        )
    }

    fn list(ctx: &CommandContext<'_>, target: &str) -> Result<String, String> {
        let long = ctx.options.has("l");
        let stat = ctx
            .fs
            .stat(target, &ctx.cwd)
            .map_err(|_| format!("cannot access '{}': No such file or directory", target))?;

        if stat.node_type == NodeType::File {
            return Ok(if long {
                Self::long_line(ctx, &stat, &stat.name)
            } else {
                format!("{}\n", stat.name)
            });
        }

        let dir = VPath::resolve(target, &ctx.cwd);
        let entries: Vec<_> = ctx
            .fs
            .list_dir(target, &ctx.cwd)
            .map_err(|e| e.to_string())?
            .into_iter()
            .filter(|entry| ctx.options.has("a") || !entry.name.starts_with('.'))
            .collect();
        if entries.is_empty() {
            return Ok(String::new());
        }

        if long {
            let mut output = String::new();
            for entry in &entries {
                // Entries come from the listing itself, so stat cannot miss.
                if let Ok(stat) = ctx.fs.stat(&dir.join(&entry.name).to_string(), "/") {
                    output.push_str(&Self::long_line(ctx, &stat, &entry.name));
                }
            }
            Ok(output)
        } else {
            let names: Vec<String> = entries
                .iter()
                .map(|entry| {
                    if entry.is_dir {
                        format!("{}/", entry.name)
                    } else {
                        entry.name.clone()
                    }
                })
                .collect();
            Ok(format!("{}\n", names.join("  ")))
        }
    }
}

impl Executable for LsCommand {
    fn description(&self) -> &'static str {
        "List directory contents"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let targets = if ctx.args.is_empty() {
            vec![ctx.cwd.clone()]
        } else {
            ctx.args.clone()
        };
        let with_headers = targets.len() > 1;
        let mut code = 0;

        for (i, target) in targets.iter().enumerate() {
            match Self::list(ctx, target) {
                Ok(output) => {
                    if with_headers {
                        let gap = if i > 0 { "\n" } else { "" };
                        ctx.stdout.write(&format!("{}{}:\n", gap, target));
                    }
                    ctx.stdout.write(&output);
                }
                Err(message) => {
                    report(ctx, "ls", message);
                    code = 1;
                }
            }
        }
        Ok(code)
    }
}
