/// A command-line word after quote removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    // Any part of the word was quoted; quoted words skip tilde, glob and option handling.
    pub quoted: bool,
}

impl Word {
    pub fn bare(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quoted: false,
        }
    }

    pub fn quoted(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quoted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Overwrite, // >
    Append,    // >>
    Input,     // <
    ReadWrite, // <> (recognised, never executed)
}

impl RedirectMode {
    pub fn default_fd(self) -> u32 {
        match self {
            Self::Overwrite | Self::Append => 1,
            Self::Input | Self::ReadWrite => 0,
        }
    }

    pub fn operator(self) -> &'static str {
        match self {
            Self::Overwrite => ">",
            Self::Append => ">>",
            Self::Input => "<",
            Self::ReadWrite => "<>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    // "> out.txt"
    Path(Word),
    // "2>&1"
    Fd(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub fd: u32,
    pub mode: RedirectMode,
    pub target: RedirectTarget,
}

/// One command of a pipeline: `name args... redirections...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    pub name: String,
    pub args: Vec<Word>,
    pub redirections: Vec<Redirection>,
}
