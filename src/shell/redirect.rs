//! Redirection resolver: turns a command string into a stage and binds its
//! descriptor table against the virtual filesystem.

use log::debug;
use std::collections::BTreeMap;

use crate::shell::ast::{PipelineStage, RedirectMode, RedirectTarget, Redirection, Word};
use crate::shell::error::ShellError;
use crate::shell::parser::{Token, tokenize};
use crate::shell::stream::Stream;
use crate::vfs::{FileSystem, FsError, VPath, WriteMode};

/// Per-stage mapping from descriptor numbers to streams.
#[derive(Debug, Clone)]
pub struct StreamTable {
    entries: BTreeMap<u32, Stream>,
}

impl StreamTable {
    pub fn new(stdin: Stream, stdout: Stream, stderr: Stream) -> Self {
        let entries = BTreeMap::from([(0, stdin), (1, stdout), (2, stderr)]);
        Self { entries }
    }

    pub fn get(&self, fd: u32) -> Option<&Stream> {
        self.entries.get(&fd)
    }

    pub fn bind(&mut self, fd: u32, stream: Stream) {
        self.entries.insert(fd, stream);
    }

    pub fn stdin(&self) -> Stream {
        self.standard(0)
    }

    pub fn stdout(&self) -> Stream {
        self.standard(1)
    }

    pub fn stderr(&self) -> Stream {
        self.standard(2)
    }

    // Seeded in `new` and only ever rebound, never removed.
    fn standard(&self, fd: u32) -> Stream {
        self.entries.get(&fd).cloned().unwrap_or_else(Stream::buffer)
    }

    /// Distinct file-backed streams, each listed once even when several
    /// descriptors share it.
    pub fn file_streams(&self) -> Vec<Stream> {
        let mut streams: Vec<Stream> = Vec::new();
        for stream in self.entries.values() {
            if stream.file_path().is_some() && !streams.iter().any(|s| s.same_as(stream)) {
                streams.push(stream.clone());
            }
        }
        streams
    }
}

/// A stage whose redirections have been applied.
#[derive(Debug)]
pub struct ResolvedStage {
    pub name: String,
    pub args: Vec<Word>,
    pub streams: StreamTable,
}

/// Split a command string into name, arguments and redirections.
pub fn extract(command: &str) -> Result<PipelineStage, ShellError> {
    let mut words: Vec<Word> = Vec::new();
    let mut redirections = Vec::new();
    let mut tokens = tokenize(command).into_iter();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => words.push(word),
            Token::Redirect { fd, mode } => {
                let Some(Token::Word(target)) = tokens.next() else {
                    return Err(ShellError::MissingRedirectTarget(mode.operator().to_string()));
                };
                let fd = fd.unwrap_or_else(|| mode.default_fd());
                redirections.push(Redirection {
                    fd,
                    mode,
                    target: parse_target(fd, target)?,
                });
            }
        }
    }

    let mut words = words.into_iter();
    let name = words.next().map(|w| w.text).unwrap_or_default();
    Ok(PipelineStage {
        name,
        args: words.collect(),
        redirections,
    })
}

fn parse_target(fd: u32, word: Word) -> Result<RedirectTarget, ShellError> {
    if word.quoted {
        return Ok(RedirectTarget::Path(word));
    }
    match word.text.strip_prefix('&') {
        Some(source) => source
            .parse()
            .map(RedirectTarget::Fd)
            .map_err(|_| ShellError::BadFileDescriptor {
                fd,
                target: source.to_string(),
            }),
        None => Ok(RedirectTarget::Path(word)),
    }
}

/// Check that `path` could be opened for writing, without touching it.
fn check_output(fs: &FileSystem, path: &str, cwd: &str) -> Result<VPath, FsError> {
    let target = VPath::resolve(path, cwd);
    if fs.is_directory(&target.to_string(), "/") {
        return Err(FsError::IsADirectory(path.to_string()));
    }
    match target.parent() {
        Some(parent) if fs.is_directory(&parent.to_string(), "/") => Ok(target),
        _ => Err(FsError::ParentMissing(path.to_string())),
    }
}

/// Apply a stage's redirections left to right on top of `defaults`.
///
/// Output targets are only checked while binding. Once every redirection
/// has resolved they are created (`>>`) or truncated (`>`), so a failing
/// stage leaves the filesystem as it was. Input files are read eagerly.
pub fn resolve(
    stage: PipelineStage,
    defaults: StreamTable,
    fs: &mut FileSystem,
    cwd: &str,
) -> Result<ResolvedStage, ShellError> {
    let mut streams = defaults;
    let mut outputs: Vec<(VPath, WriteMode)> = Vec::new();

    for Redirection { fd, mode, target } in stage.redirections {
        debug!("Applying redirection {}{}{:?}", fd, mode.operator(), target);
        let stream = match (mode, target) {
            (RedirectMode::ReadWrite, _) => {
                return Err(ShellError::UnsupportedRedirection(mode.operator().to_string()));
            }
            (_, RedirectTarget::Fd(source)) => streams
                .get(source)
                .cloned()
                .ok_or_else(|| ShellError::BadFileDescriptor {
                    fd,
                    target: source.to_string(),
                })?,
            (RedirectMode::Input, RedirectTarget::Path(path)) => {
                Stream::with_content(fs.read_file(&path.text, cwd)?)
            }
            (RedirectMode::Overwrite, RedirectTarget::Path(path)) => {
                let target = check_output(fs, &path.text, cwd)?;
                outputs.push((target.clone(), WriteMode::Overwrite));
                Stream::to_file(target.to_string())
            }
            (RedirectMode::Append, RedirectTarget::Path(path)) => {
                let target = check_output(fs, &path.text, cwd)?;
                outputs.push((target.clone(), WriteMode::Append));
                Stream::to_file(target.to_string())
            }
        };
        streams.bind(fd, stream);
    }

    for (target, mode) in outputs {
        fs.write_file(&target.to_string(), "", "/", mode)?;
    }

    Ok(ResolvedStage {
        name: stage.name,
        args: stage.args,
        streams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryStorage, Node};

    fn fs() -> FileSystem {
        FileSystem::new(Node::directory("/"), Box::new(MemoryStorage::new()))
    }

    fn defaults() -> StreamTable {
        StreamTable::new(Stream::buffer(), Stream::buffer(), Stream::buffer())
    }

    #[test]
    fn test_extract_defaults_fds() {
        let stage = extract("sort < in.txt > out.txt 2>> err.log").unwrap();
        assert_eq!(stage.name, "sort");
        assert!(stage.args.is_empty());
        let fds: Vec<u32> = stage.redirections.iter().map(|r| r.fd).collect();
        assert_eq!(fds, vec![0, 1, 2]);
        assert_eq!(stage.redirections[2].mode, RedirectMode::Append);
    }

    #[test]
    fn test_extract_dup_target() {
        let stage = extract("cmd a 2>&1").unwrap();
        assert_eq!(stage.args, vec![Word::bare("a")]);
        assert_eq!(stage.redirections[0].target, RedirectTarget::Fd(1));

        // A quoted ampersand is a file name.
        let stage = extract("cmd > '&1'").unwrap();
        assert_eq!(
            stage.redirections[0].target,
            RedirectTarget::Path(Word::quoted("&1"))
        );
    }

    #[test]
    fn test_extract_errors() {
        assert_eq!(
            extract("echo hi >"),
            Err(ShellError::MissingRedirectTarget(">".to_string()))
        );
        assert_eq!(
            extract("echo hi > > x"),
            Err(ShellError::MissingRedirectTarget(">".to_string()))
        );
        assert_eq!(
            extract("echo hi >&x"),
            Err(ShellError::BadFileDescriptor {
                fd: 1,
                target: "x".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_output_creates_file() {
        let mut fs = fs();
        let stage = extract("echo > out.txt").unwrap();
        let resolved = resolve(stage, defaults(), &mut fs, "/").unwrap();
        assert_eq!(fs.read_file("/out.txt", "/").unwrap(), "");
        assert_eq!(resolved.streams.stdout().file_path().as_deref(), Some("/out.txt"));
    }

    #[test]
    fn test_resolve_truncates_but_append_keeps() {
        let mut fs = fs();
        fs.write_file("/f", "old", "/", WriteMode::Overwrite).unwrap();

        resolve(extract("x >> f").unwrap(), defaults(), &mut fs, "/").unwrap();
        assert_eq!(fs.read_file("/f", "/").unwrap(), "old");

        resolve(extract("x > f").unwrap(), defaults(), &mut fs, "/").unwrap();
        assert_eq!(fs.read_file("/f", "/").unwrap(), "");
    }

    #[test]
    fn test_resolve_input_reads_eagerly() {
        let mut fs = fs();
        fs.write_file("/in", "data", "/", WriteMode::Overwrite).unwrap();
        let resolved = resolve(extract("cat < in").unwrap(), defaults(), &mut fs, "/").unwrap();
        fs.write_file("/in", "changed", "/", WriteMode::Overwrite).unwrap();
        assert_eq!(resolved.streams.stdin().read(), "data");
    }

    #[test]
    fn test_resolve_dup_follows_current_binding() {
        let mut fs = fs();
        let resolved = resolve(extract("cmd > out 2>&1").unwrap(), defaults(), &mut fs, "/").unwrap();
        assert!(resolved.streams.stderr().same_as(&resolved.streams.stdout()));
        assert_eq!(resolved.streams.file_streams().len(), 1);

        // Order matters: stderr copies stdout before stdout moves.
        let table = defaults();
        let original_stdout = table.stdout();
        let resolved = resolve(extract("cmd 2>&1 > out").unwrap(), table, &mut fs, "/").unwrap();
        assert!(resolved.streams.stderr().same_as(&original_stdout));
    }

    #[test]
    fn test_resolve_errors() {
        let mut fs = fs();
        assert_eq!(
            resolve(extract("cmd 2>&5").unwrap(), defaults(), &mut fs, "/").unwrap_err(),
            ShellError::BadFileDescriptor {
                fd: 2,
                target: "5".to_string()
            }
        );
        assert_eq!(
            ShellError::BadFileDescriptor {
                fd: 2,
                target: "5".to_string()
            }
            .to_string(),
            "2>&5: Bad file descriptor"
        );
        assert_eq!(
            resolve(extract("cat < nope").unwrap(), defaults(), &mut fs, "/").unwrap_err(),
            ShellError::Io(FsError::NotFound("nope".to_string()))
        );
        assert_eq!(
            resolve(extract("echo > /no/dir/f").unwrap(), defaults(), &mut fs, "/").unwrap_err(),
            ShellError::Io(FsError::ParentMissing("/no/dir/f".to_string()))
        );
        assert_eq!(
            resolve(extract("echo > /").unwrap(), defaults(), &mut fs, "/").unwrap_err(),
            ShellError::Io(FsError::IsADirectory("/".to_string()))
        );
        let err = resolve(extract("cat <> f").unwrap(), defaults(), &mut fs, "/").unwrap_err();
        assert_eq!(err, ShellError::UnsupportedRedirection("<>".to_string()));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_failed_resolve_leaves_files_alone() {
        let mut fs = fs();
        fs.write_file("/keep", "data", "/", WriteMode::Overwrite).unwrap();

        assert!(resolve(extract("x > keep 2>&7").unwrap(), defaults(), &mut fs, "/").is_err());
        assert_eq!(fs.read_file("/keep", "/").unwrap(), "data");

        assert!(resolve(extract("x > new < missing").unwrap(), defaults(), &mut fs, "/").is_err());
        assert!(!fs.exists("/new", "/"));
    }

    #[test]
    fn test_resolve_binds_new_descriptor() {
        let mut fs = fs();
        let resolved = resolve(extract("cmd 3> extra 4>&3").unwrap(), defaults(), &mut fs, "/").unwrap();
        let three = resolved.streams.get(3).unwrap();
        assert!(three.same_as(resolved.streams.get(4).unwrap()));
        assert!(fs.exists("/extra", "/"));
    }
}
