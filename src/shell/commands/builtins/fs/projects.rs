// Projects command

use anyhow::Result;

use crate::shell::commands::Executable;
use crate::shell::context::CommandContext;
use crate::vfs::{FileSystem, VPath};

pub struct ProjectsCommand;

impl ProjectsCommand {
    /// Directories as `- name/` with their contents indented below,
    /// markdown files as `- stem`. Other files are skipped.
    fn tree(fs: &FileSystem, dir: &VPath, indent: &str, output: &mut String) {
        let Ok(entries) = fs.list_dir(&dir.to_string(), "/") else {
            return;
        };
        for entry in entries {
            if entry.is_dir {
                output.push_str(&format!("{}- {}/\n", indent, entry.name));
                let nested = format!("{}  ", indent);
                Self::tree(fs, &dir.join(&entry.name), &nested, output);
            } else if let Some(stem) = entry.name.strip_suffix(".md") {
                output.push_str(&format!("{}- {}\n", indent, stem));
            }
        }
    }
}

impl Executable for ProjectsCommand {
    fn description(&self) -> &'static str {
        "List the projects under ~/projects"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let root = VPath::resolve("projects", ctx.home());
        if !ctx.fs.is_directory(&root.to_string(), "/") {
            ctx.stdout.write("No projects found.\n");
            return Ok(0);
        }

        let mut output = String::from("Projects:\n\n");
        Self::tree(ctx.fs, &root, "", &mut output);
        output.push_str("\nUse `cat projects/<category>/<project>.md` to read details.\n");
        ctx.stdout.write(&output);
        Ok(0)
    }
}
