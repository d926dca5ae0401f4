use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::sync::Arc;

use crate::shell::commands::Executable;
use crate::shell::commands::builtins::register_all_builtins;
use crate::vfs::FileSystem;

/// First-line marker of a unit file naming its implementation.
pub const UNIT_HEADER: &str = "#!vsh";

/// Maps command names to implementations through unit files.
///
/// A command exists when `<PATH>/<name>.<ext>` is a file in the virtual
/// filesystem. Its header selects a registered implementation, so the
/// tree (not this table) decides which commands are available.
pub struct CommandRegistry {
    implementations: HashMap<String, Arc<dyn Executable>>,
    ext: String,
}

impl CommandRegistry {
    pub fn new(ext: &str) -> Self {
        Self {
            implementations: HashMap::new(),
            ext: ext.to_string(),
        }
    }

    pub fn with_builtins(ext: &str) -> Self {
        let mut registry = Self::new(ext);
        register_all_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &str, command: Arc<dyn Executable>) {
        self.implementations.insert(name.to_string(), command);
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Resolve `name` through its unit file in `path_dir`.
    pub fn load(&self, fs: &FileSystem, path_dir: &str, name: &str) -> Result<Arc<dyn Executable>> {
        if name.is_empty() || name.contains('/') {
            bail!("invalid command name '{}'", name);
        }
        let unit_path = format!("{}/{}.{}", path_dir, name, self.ext);
        let content = fs
            .read_file(&unit_path, "/")
            .with_context(|| format!("cannot read unit {}", unit_path))?;

        let implementation = implementation_name(&content).unwrap_or(name);
        self.implementations
            .get(implementation)
            .cloned()
            .with_context(|| format!("unit {} names unknown implementation '{}'", unit_path, implementation))
    }

    /// Command names available in `path_dir`, sorted.
    pub fn command_names(&self, fs: &FileSystem, path_dir: &str) -> Vec<String> {
        let suffix = format!(".{}", self.ext);
        let Ok(entries) = fs.list_dir(path_dir, "/") else {
            return Vec::new();
        };
        entries
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| entry.name.strip_suffix(&suffix).map(str::to_string))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Description for a command as its unit file presents it.
    pub fn describe(&self, fs: &FileSystem, path_dir: &str, name: &str) -> Option<&'static str> {
        self.load(fs, path_dir, name).ok().map(|cmd| cmd.description())
    }

    /// `(file name, content)` of one unit file per registered implementation.
    pub fn unit_files(&self) -> Vec<(String, String)> {
        let mut units: Vec<(String, String)> = self
            .implementations
            .iter()
            .map(|(name, cmd)| {
                (
                    format!("{}.{}", name, self.ext),
                    format!("{} {}\n{}\n", UNIT_HEADER, name, cmd.description()),
                )
            })
            .collect();
        units.sort();
        units
    }
}

fn implementation_name(content: &str) -> Option<&str> {
    let first = content.lines().next()?;
    let name = first.strip_prefix(UNIT_HEADER)?.trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryStorage, Node, WriteMode};

    fn setup() -> (CommandRegistry, FileSystem) {
        let registry = CommandRegistry::with_builtins("cmd");
        let mut fs = FileSystem::new(Node::directory("/"), Box::new(MemoryStorage::new()));
        fs.create_directory("/bin", "/").unwrap();
        for (name, content) in registry.unit_files() {
            fs.write_file(&format!("/bin/{}", name), &content, "/", WriteMode::Overwrite)
                .unwrap();
        }
        (registry, fs)
    }

    #[test]
    fn test_load_from_unit_file() {
        let (registry, fs) = setup();
        let cmd = registry.load(&fs, "/bin", "echo").unwrap();
        assert_eq!(cmd.description(), registry.describe(&fs, "/bin", "echo").unwrap());
        assert!(registry.load(&fs, "/bin", "nope").is_err());
    }

    #[test]
    fn test_header_selects_implementation() {
        let (registry, mut fs) = setup();
        fs.write_file("/bin/say.cmd", "#!vsh echo\nalias of echo\n", "/", WriteMode::Overwrite)
            .unwrap();
        let say = registry.load(&fs, "/bin", "say").unwrap();
        let echo = registry.load(&fs, "/bin", "echo").unwrap();
        assert!(Arc::ptr_eq(&say, &echo));

        // No header: the file stem names the implementation.
        fs.write_file("/bin/pwd.cmd", "prints the directory", "/", WriteMode::Overwrite)
            .unwrap();
        assert!(registry.load(&fs, "/bin", "pwd").is_ok());

        fs.write_file("/bin/bad.cmd", "#!vsh missing\n", "/", WriteMode::Overwrite)
            .unwrap();
        assert!(registry.load(&fs, "/bin", "bad").is_err());
    }

    #[test]
    fn test_directory_unit_is_not_a_command() {
        let (registry, mut fs) = setup();
        fs.create_directory("/bin/dir.cmd", "/").unwrap();
        assert!(registry.load(&fs, "/bin", "dir").is_err());
        assert!(!registry.command_names(&fs, "/bin").contains(&"dir".to_string()));
    }

    #[test]
    fn test_deleting_unit_removes_command() {
        let (registry, mut fs) = setup();
        assert!(registry.command_names(&fs, "/bin").contains(&"cat".to_string()));
        fs.delete("/bin/cat.cmd", false, "/").unwrap();
        assert!(registry.load(&fs, "/bin", "cat").is_err());
        assert!(!registry.command_names(&fs, "/bin").contains(&"cat".to_string()));
    }
}
