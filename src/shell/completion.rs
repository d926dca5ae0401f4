//! Tab completion over command names and virtual paths.

use crate::shell::context::ShellContext;
use crate::shell::executor::expand_tilde;
use crate::shell::parser::pipe_positions;
use crate::vfs::VPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The whole input with the single candidate filled in.
    Complete(String),
    /// Candidate names, directories suffixed with `/`.
    Suggestions(Vec<String>),
}

/// Complete the end of `input`.
///
/// The first word of a pipeline segment is completed as a command name,
/// any later word as a path relative to the working directory.
pub fn complete(input: &str, shell: &ShellContext) -> Option<Completion> {
    let start = pipe_positions(input).last().map_or(0, |pos| pos + 1);
    let segment = &input[start..];

    let new_word = segment.is_empty() || segment.ends_with(char::is_whitespace);
    let words: Vec<&str> = segment.split_whitespace().collect();
    let token = if new_word { "" } else { words.last().copied().unwrap_or("") };
    let prefix = &input[..input.len() - token.len()];

    // Blank input after a pipe still wants a command; blank input on its own lists paths.
    let is_command = match words.len() {
        0 => start > 0 || segment.is_empty(),
        1 => !new_word,
        _ => false,
    };
    let candidates = if is_command {
        command_candidates(token, shell)
    } else {
        path_candidates(token, shell)
    };

    match candidates.len() {
        0 => None,
        1 => Some(Completion::Complete(format!("{}{}", prefix, candidates[0]))),
        _ => Some(Completion::Suggestions(
            candidates.iter().map(|c| suggestion_name(c)).collect(),
        )),
    }
}

/// Display name of a candidate: last path component, trailing space dropped.
fn suggestion_name(candidate: &str) -> String {
    let candidate = candidate.trim_end_matches(' ');
    let (body, slash) = match candidate.strip_suffix('/') {
        Some(body) => (body, "/"),
        None => (candidate, ""),
    };
    let name = body.rsplit('/').next().unwrap_or(body);
    format!("{}{}", name, slash)
}

fn command_candidates(token: &str, shell: &ShellContext) -> Vec<String> {
    let mut names = shell.registry.command_names(&shell.fs, shell.path_dir());
    names.extend(shell.aliases.keys().cloned());
    names.sort();
    names.dedup();
    names
        .into_iter()
        .filter(|name| name.starts_with(token))
        .map(|name| format!("{} ", name))
        .collect()
}

fn path_candidates(token: &str, shell: &ShellContext) -> Vec<String> {
    let cwd = shell.cwd();
    let (dir_part, search) = match token.rfind('/') {
        Some(i) => (&token[..=i], &token[i + 1..]),
        None => ("", token),
    };
    let dir = if dir_part.is_empty() { "." } else { dir_part };
    let dir_path = VPath::resolve(&expand_tilde(dir, shell.home()), cwd);

    let Ok(entries) = shell.fs.list_dir(&dir_path.to_string(), "/") else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter(|entry| entry.name.starts_with(search))
        .map(|entry| {
            let suffix = if entry.is_dir { "/" } else { " " };
            format!("{}{}{}", dir_part, entry.name, suffix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_name() {
        assert_eq!(suggestion_name("a/b/dir/"), "dir/");
        assert_eq!(suggestion_name("a/file "), "file");
        assert_eq!(suggestion_name("ls "), "ls");
    }
}
