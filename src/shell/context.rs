use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;

use crate::config::VshConfig;
use crate::shell::ast::Word;
use crate::shell::commands::registry::CommandRegistry;
use crate::shell::stream::Stream;
use crate::vfs::seed::{self, SeedLayout};
use crate::vfs::{FileSystem, Node, Storage};

/// Interpreter state that outlives a single command line.
pub struct ShellContext {
    pub fs: FileSystem,
    pub env: BTreeMap<String, String>,
    pub aliases: BTreeMap<String, String>,
    pub registry: CommandRegistry,
    pub exit_code: i32,
}

impl ShellContext {
    /// Build a shell from configuration, restoring the tree from `storage`.
    ///
    /// With `reset`, persisted state is discarded and the seed tree is used.
    pub fn boot(config: &VshConfig, storage: Box<dyn Storage>, reset: bool) -> Result<Self> {
        let registry = CommandRegistry::with_builtins(config.shell.command_ext());
        let home = config.shell.home();
        let bin_dir = config.shell.path();

        let seed_tree = || -> Node {
            if let Some(path) = &config.shell.seed_file {
                match seed::from_json_file(path) {
                    Ok(root) => {
                        info!("Seeding filesystem from {}", path.display());
                        return root;
                    }
                    Err(e) => warn!("Ignoring seed file: {:#}", e),
                }
            }
            info!("Seeding default filesystem");
            let layout = SeedLayout {
                user: config.shell.user(),
                home: &home,
                bin_dir: &bin_dir,
            };
            seed::default_tree(&layout, registry.unit_files())
        };

        let mut fs = FileSystem::load(storage, &seed_tree);
        if reset {
            info!("Resetting filesystem");
            fs.reset(seed_tree());
        }

        let mut env = BTreeMap::from([
            ("HOME".to_string(), home.clone()),
            ("USER".to_string(), config.shell.user().to_string()),
            ("HOSTNAME".to_string(), config.shell.hostname().to_string()),
            ("SHELL".to_string(), "/bin/vsh".to_string()),
            ("PATH".to_string(), bin_dir),
        ]);
        env.extend(config.env.clone());

        let mut shell = Self {
            fs,
            env,
            aliases: config.aliases(),
            registry,
            exit_code: 0,
        };
        // A home that a custom seed does not contain falls back to the root.
        let start = if shell.fs.is_directory(&home, "/") { home } else { "/".to_string() };
        shell.set_cwd(&start);
        Ok(shell)
    }

    pub fn cwd(&self) -> &str {
        self.var("PWD").unwrap_or("/")
    }

    pub fn set_cwd(&mut self, cwd: &str) {
        self.env.insert("PWD".to_string(), cwd.to_string());
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn home(&self) -> &str {
        self.var("HOME").unwrap_or("/")
    }

    pub fn path_dir(&self) -> &str {
        self.var("PATH").unwrap_or("/")
    }

    /// `user@hostname:cwd$ ` with the home directory shown as `~`.
    pub fn prompt(&self) -> String {
        let cwd = self.cwd();
        let home = self.home();
        let shown = match cwd.strip_prefix(home) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{}", rest),
            _ => cwd.to_string(),
        };
        format!(
            "{}@{}:{}$ ",
            self.var("USER").unwrap_or("guest"),
            self.var("HOSTNAME").unwrap_or("vsh"),
            shown
        )
    }
}

/// Parsed `-x` / `--name[=value]` options of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    flags: BTreeMap<String, Option<String>>,
}

impl Options {
    pub fn has(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).and_then(|v| v.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn insert(&mut self, name: &str, value: Option<String>) {
        self.flags.insert(name.to_string(), value);
    }
}

/// Separate options from positional arguments.
///
/// `--name` and `--name=value` are long options, `-la` is the cluster `l`,
/// `a`, and `-n5` is the option `n` with value `5`. A lone `-`, quoted words
/// and everything after `--` are positional.
pub fn parse_args(words: &[Word]) -> (Vec<String>, Options) {
    let mut args = Vec::new();
    let mut options = Options::default();
    let mut options_done = false;

    for word in words {
        let text = word.text.as_str();
        if options_done || word.quoted || text == "-" || !text.starts_with('-') {
            args.push(text.to_string());
            continue;
        }

        if text == "--" {
            options_done = true;
        } else if let Some(long) = text.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, value)) => options.insert(name, Some(value.to_string())),
                None => options.insert(long, None),
            }
        } else {
            let short = &text[1..];
            let mut chars = short.chars();
            let first = chars.next().map(|c| c.to_string()).unwrap_or_default();
            let rest = chars.as_str();
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                options.insert(&first, Some(rest.to_string()));
            } else {
                for c in short.chars() {
                    options.insert(&c.to_string(), None);
                }
            }
        }
    }

    (args, options)
}

/// Everything a command unit sees while it runs.
pub struct CommandContext<'a> {
    pub fs: &'a mut FileSystem,
    pub registry: &'a CommandRegistry,
    pub env: BTreeMap<String, String>,
    /// Working directory; a command may change it (`cd`) and the shell adopts it.
    pub cwd: String,
    pub args: Vec<String>,
    pub options: Options,
    pub stdin: Stream,
    pub stdout: Stream,
    pub stderr: Stream,
}

impl CommandContext<'_> {
    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn home(&self) -> &str {
        self.var("HOME").unwrap_or("/")
    }
}
