use crate::shell::ast::{RedirectMode, Word};

/// Lexical unit of a single command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Word),
    // The operator only; its target is the following word.
    Redirect { fd: Option<u32>, mode: RedirectMode },
}

/// Byte offsets of every `|` that is outside quotes and not escaped.
pub fn pipe_positions(line: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some('"'), '\\') => escaped = true,
            (Some(_), _) => {}
            (None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (None, '|') => positions.push(i),
            _ => {}
        }
    }
    positions
}

/// Split a raw line into command strings on unquoted pipes.
///
/// Segments are trimmed and empty ones are dropped, so `a || b` and a
/// trailing `|` yield only the non-empty commands.
pub fn split_pipeline(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    for pos in pipe_positions(line) {
        segments.push(&line[start..pos]);
        start = pos + 1;
    }
    segments.push(&line[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Default)]
struct WordBuf {
    text: String,
    started: bool,
    quoted: bool,
}

impl WordBuf {
    fn push(&mut self, c: char) {
        self.text.push(c);
        self.started = true;
    }

    /// The pending text is a plain descriptor number such as the `2` of `2>`.
    fn as_fd(&self) -> Option<u32> {
        if self.quoted || self.text.is_empty() || !self.text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.text.parse().ok()
    }

    fn take(&mut self) -> Option<Word> {
        let buf = std::mem::take(self);
        buf.started.then_some(Word {
            text: buf.text,
            quoted: buf.quoted,
        })
    }
}

/// Tokenize one command string into words and redirection operators.
///
/// Single quotes are fully literal. Inside double quotes a backslash only
/// escapes `"` and `\`. An unterminated quote keeps its quote character.
pub fn tokenize(command: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = WordBuf::default();
    // Active quote and the offset in `word.text` where it opened.
    let mut quote: Option<(char, usize)> = None;
    let mut escaped = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        if escaped {
            word.push(c);
            escaped = false;
            continue;
        }

        if let Some((q, _)) = quote {
            if c == q {
                quote = None;
            } else if q == '"' && c == '\\' && matches!(chars.peek(), Some('"' | '\\')) {
                if let Some(next) = chars.next() {
                    word.push(next);
                }
            } else {
                word.push(c);
            }
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                word.started = true;
                word.quoted = true;
            }
            '\'' | '"' => {
                quote = Some((c, word.text.len()));
                word.started = true;
                word.quoted = true;
            }
            '>' | '<' => {
                let fd = word.as_fd();
                if fd.is_some() {
                    word = WordBuf::default();
                } else if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }

                let mode = match (c, chars.peek()) {
                    ('>', Some('>')) => {
                        chars.next();
                        RedirectMode::Append
                    }
                    ('>', _) => RedirectMode::Overwrite,
                    ('<', Some('>')) => {
                        chars.next();
                        RedirectMode::ReadWrite
                    }
                    _ => RedirectMode::Input,
                };
                tokens.push(Token::Redirect { fd, mode });
            }
            c if c.is_whitespace() => {
                if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }
            }
            _ => word.push(c),
        }
    }

    if escaped {
        word.push('\\');
    }
    if let Some((q, at)) = quote {
        word.text.insert(at, q);
    }
    if let Some(w) = word.take() {
        tokens.push(Token::Word(w));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.text.as_str()),
                Token::Redirect { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_split_basic() {
        assert_eq!(split_pipeline("ls -l | grep a | wc"), vec!["ls -l", "grep a", "wc"]);
        assert_eq!(split_pipeline("echo hi"), vec!["echo hi"]);
    }

    #[test]
    fn test_split_discards_empty_segments() {
        assert_eq!(split_pipeline(" | a ||  b | "), vec!["a", "b"]);
        assert!(split_pipeline("   ").is_empty());
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(
            split_pipeline(r#"echo "a | b" 'c|d' | cat"#),
            vec![r#"echo "a | b" 'c|d'"#, "cat"]
        );
        assert_eq!(split_pipeline(r"echo a\|b"), vec![r"echo a\|b"]);
    }

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize(r#"echo "hello world" 'it''s' "" plain"#);
        assert_eq!(words(&tokens), vec!["echo", "hello world", "its", "", "plain"]);
        match &tokens[1] {
            Token::Word(w) => assert!(w.quoted),
            other => panic!("unexpected token {:?}", other),
        }
        match &tokens[4] {
            Token::Word(w) => assert!(!w.quoted),
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_tokenize_backslashes() {
        assert_eq!(words(&tokenize(r"echo a\ b")), vec!["echo", "a b"]);
        assert_eq!(words(&tokenize(r#"echo "a\nb" "q\"q""#)), vec!["echo", r"a\nb", "q\"q"]);
        assert_eq!(words(&tokenize(r"echo 'a\b'")), vec!["echo", r"a\b"]);
    }

    #[test]
    fn test_tokenize_unterminated_quote_is_literal() {
        assert_eq!(words(&tokenize("echo 'abc")), vec!["echo", "'abc"]);
        assert_eq!(words(&tokenize("echo x\"y z")), vec!["echo", "x\"y z"]);
    }

    #[test]
    fn test_tokenize_redirections() {
        let tokens = tokenize("cmd arg > out 2>&1 <in >>log");
        assert_eq!(
            tokens,
            vec![
                Token::Word(Word::bare("cmd")),
                Token::Word(Word::bare("arg")),
                Token::Redirect { fd: None, mode: RedirectMode::Overwrite },
                Token::Word(Word::bare("out")),
                Token::Redirect { fd: Some(2), mode: RedirectMode::Overwrite },
                Token::Word(Word::bare("&1")),
                Token::Redirect { fd: None, mode: RedirectMode::Input },
                Token::Word(Word::bare("in")),
                Token::Redirect { fd: None, mode: RedirectMode::Append },
                Token::Word(Word::bare("log")),
            ]
        );
    }

    #[test]
    fn test_tokenize_fd_must_be_whole_word() {
        let tokens = tokenize("echo abc2>x");
        assert_eq!(tokens[1], Token::Word(Word::bare("abc2")));
        assert_eq!(tokens[2], Token::Redirect { fd: None, mode: RedirectMode::Overwrite });

        let tokens = tokenize("echo '2'>x");
        assert_eq!(tokens[1], Token::Word(Word::quoted("2")));
    }

    #[test]
    fn test_tokenize_quoted_operators_are_literal() {
        assert_eq!(words(&tokenize(r#"echo ">" '<'"#)), vec!["echo", ">", "<"]);
        assert_eq!(
            tokenize("cat <> f")[1],
            Token::Redirect { fd: None, mode: RedirectMode::ReadWrite }
        );
    }
}
