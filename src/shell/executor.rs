//! Pipeline orchestrator.
//!
//! Stages run one after another. Each stage's stdout is fully buffered and
//! handed to the next stage as stdin; stderr always goes to the caller's
//! error stream. The first stage that exits non-zero stops the pipeline.

use glob::Pattern;
use log::{debug, warn};

use crate::shell::ast::{PipelineStage, RedirectTarget, Word};
use crate::shell::context::{CommandContext, ShellContext, parse_args};
use crate::shell::error::ShellError;
use crate::shell::parser::split_pipeline;
use crate::shell::redirect::{ResolvedStage, StreamTable, extract, resolve};
use crate::shell::stream::Stream;
use crate::vfs::WriteMode;

/// Run one input line and return the exit code of the last stage that ran.
pub fn run_command_line(line: &str, shell: &mut ShellContext, stdout: &Stream, stderr: &Stream) -> i32 {
    let stages = split_pipeline(line);
    let Some(last) = stages.len().checked_sub(1) else {
        return shell.exit_code;
    };

    let mut exit_code = 0;
    let mut piped = String::new();
    for (i, command) in stages.iter().enumerate() {
        let pipe = Stream::buffer();
        let stage_stdout = if i == last { stdout.clone() } else { pipe.clone() };
        let defaults = StreamTable::new(
            Stream::with_content(std::mem::take(&mut piped)),
            stage_stdout,
            stderr.clone(),
        );

        exit_code = run_stage(command, defaults, shell, stderr);
        if exit_code != 0 {
            debug!("Stage {} ({}) exited with {}, stopping pipeline", i, command, exit_code);
            break;
        }
        piped = pipe.read();
    }

    shell.exit_code = exit_code;
    exit_code
}

fn run_stage(command: &str, defaults: StreamTable, shell: &mut ShellContext, stderr: &Stream) -> i32 {
    let resolved = match prepare(command, defaults, shell) {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("Stage '{}' failed to resolve: {}", command, e);
            stderr.write(&format!("{}\n", e));
            return e.exit_code();
        }
    };

    let files = resolved.streams.file_streams();
    let mut exit_code = execute(resolved, shell);

    // Redirected output lands in the files once the command is done.
    for stream in files {
        let data = stream.read();
        let Some(path) = stream.file_path() else { continue };
        if data.is_empty() {
            continue;
        }
        if let Err(e) = shell.fs.write_file(&path, &data, "/", WriteMode::Append) {
            stderr.write(&format!("{}\n", ShellError::from(e)));
            exit_code = 1;
        }
    }
    exit_code
}

fn prepare(command: &str, defaults: StreamTable, shell: &mut ShellContext) -> Result<ResolvedStage, ShellError> {
    let stage = expand(extract(command)?, shell);
    debug!("Resolving stage {:?}", stage);
    let cwd = shell.cwd().to_string();
    resolve(stage, defaults, &mut shell.fs, &cwd)
}

fn execute(stage: ResolvedStage, shell: &mut ShellContext) -> i32 {
    let ResolvedStage { name, args, streams } = stage;
    // Only redirections: nothing to run.
    if name.is_empty() {
        return 0;
    }

    let command = match shell.registry.load(&shell.fs, shell.path_dir(), &name) {
        Ok(command) => command,
        Err(e) => {
            warn!("Cannot load command '{}': {:#}", name, e);
            let err = ShellError::CommandNotFound(name);
            streams.stderr().write(&format!("{}\n", err));
            return err.exit_code();
        }
    };

    let (args, options) = parse_args(&args);
    let cwd = shell.cwd().to_string();
    let mut ctx = CommandContext {
        fs: &mut shell.fs,
        registry: &shell.registry,
        env: shell.env.clone(),
        cwd: cwd.clone(),
        args,
        options,
        stdin: streams.stdin(),
        stdout: streams.stdout(),
        stderr: streams.stderr(),
    };

    debug!("Executing {} {:?}", name, ctx.args);
    let exit_code = match command.execute(&mut ctx) {
        Ok(code) => code,
        Err(e) => {
            ctx.stderr.write(&format!("{}: {:#}\n", name, e));
            1
        }
    };

    let new_cwd = ctx.cwd;
    if new_cwd != cwd {
        shell.set_cwd(&new_cwd);
    }
    exit_code
}

/// Alias, tilde and wildcard expansion of a parsed stage.
fn expand(mut stage: PipelineStage, shell: &ShellContext) -> PipelineStage {
    if let Some(expansion) = shell.aliases.get(&stage.name) {
        match shell_words::split(expansion) {
            Ok(mut words) if !words.is_empty() => {
                stage.name = words.remove(0);
                let mut args: Vec<Word> = words.iter().map(|w| Word::bare(w)).collect();
                args.append(&mut stage.args);
                stage.args = args;
            }
            Ok(_) => {}
            Err(e) => warn!("Ignoring alias '{}': {}", stage.name, e),
        }
    }

    let home = shell.home();
    let cwd = shell.cwd();
    stage.args = stage
        .args
        .into_iter()
        .flat_map(|word| expand_word(word, home, shell, cwd))
        .collect();

    for redirection in &mut stage.redirections {
        if let RedirectTarget::Path(word) = &mut redirection.target {
            if !word.quoted {
                word.text = expand_tilde(&word.text, home);
            }
        }
    }
    stage
}

fn expand_word(word: Word, home: &str, shell: &ShellContext, cwd: &str) -> Vec<Word> {
    if word.quoted {
        return vec![word];
    }
    let text = expand_tilde(&word.text, home);
    if !text.contains(['*', '?', '[']) {
        return vec![Word::bare(&text)];
    }

    let matches = glob_matches(&text, shell, cwd);
    if matches.is_empty() {
        // No match keeps the literal word.
        return vec![Word::bare(&text)];
    }
    // Matched names are final; they must not be globbed or parsed as options again.
    matches.iter().map(|m| Word::quoted(m)).collect()
}

pub(crate) fn expand_tilde(text: &str, home: &str) -> String {
    if text == "~" {
        home.to_string()
    } else if let Some(rest) = text.strip_prefix("~/") {
        format!("{}/{}", home.trim_end_matches('/'), rest)
    } else {
        text.to_string()
    }
}

/// Match the last path component of `text` against its directory.
fn glob_matches(text: &str, shell: &ShellContext, cwd: &str) -> Vec<String> {
    let (dir, prefix, pattern) = match text.rfind('/') {
        Some(i) => (&text[..=i], &text[..=i], &text[i + 1..]),
        None => (".", "", text),
    };
    let Ok(pattern) = Pattern::new(pattern) else {
        return Vec::new();
    };
    let Ok(entries) = shell.fs.read_dir(dir, cwd) else {
        return Vec::new();
    };

    let show_hidden = pattern.as_str().starts_with('.');
    entries
        .into_iter()
        .filter(|name| show_hidden || !name.starts_with('.'))
        .filter(|name| pattern.matches(name))
        .map(|name| format!("{}{}", prefix, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~", "/home/a"), "/home/a");
        assert_eq!(expand_tilde("~/x/y", "/home/a"), "/home/a/x/y");
        assert_eq!(expand_tilde("~other", "/home/a"), "~other");
        assert_eq!(expand_tilde("a~", "/home/a"), "a~");
    }
}
