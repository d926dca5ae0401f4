use anyhow::{Context as _, Result};
use colored::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use vsh::shell::{Completion, ShellContext, Stream, complete, run_command_line};

/// Streams that print to the terminal; stderr lines are shown in red.
pub fn display_streams() -> (Stream, Stream) {
    let stdout = Stream::to_destination(|data| {
        print!("{}", data);
        let _ = std::io::stdout().flush();
    });
    let stderr = Stream::to_destination(|data| eprint!("{}", data.red()));
    (stdout, stderr)
}

/// Line-editor helper delegating Tab to the completion engine.
struct ShellHelper {
    shell: Rc<RefCell<ShellContext>>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        let shell = self.shell.borrow();

        match complete(input, &shell) {
            None => Ok((pos, Vec::new())),
            Some(Completion::Complete(value)) => Ok((
                0,
                vec![Pair {
                    display: value.clone(),
                    replacement: value,
                }],
            )),
            Some(Completion::Suggestions(names)) => {
                // Suggestions replace only the word being typed, keeping its directory part.
                let start = input
                    .rfind(|c: char| c.is_whitespace() || c == '|')
                    .map_or(0, |i| i + 1);
                let word = &input[start..];
                let dir = word.rfind('/').map_or("", |i| &word[..=i]);
                let candidates = names
                    .into_iter()
                    .map(|name| Pair {
                        replacement: format!("{}{}", dir, name),
                        display: name,
                    })
                    .collect();
                Ok((start, candidates))
            }
        }
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(&'s self, prompt: &'p str, _default: bool) -> Cow<'b, str> {
        Cow::Owned(prompt.green().bold().to_string())
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Interactive loop; returns when the user types `exit` or sends EOF.
pub fn run(shell: ShellContext) -> Result<()> {
    let shell = Rc::new(RefCell::new(shell));
    let config = Config::builder()
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<ShellHelper, DefaultHistory> =
        Editor::with_config(config).context("Failed to create line editor")?;
    rl.set_helper(Some(ShellHelper {
        shell: shell.clone(),
    }));

    let (stdout, stderr) = display_streams();
    loop {
        let prompt = shell.borrow().prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" {
                    break;
                }
                run_command_line(line, &mut shell.borrow_mut(), &stdout, &stderr);
            }
            // Ctrl-C drops the current line.
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }
    Ok(())
}
