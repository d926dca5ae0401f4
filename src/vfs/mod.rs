//! In-memory hierarchical filesystem.
//!
//! [`FileSystem`] exclusively owns the node tree. Callers address nodes by
//! path string plus working directory; nothing outside this module holds a
//! node across calls. Every mutating operation saves the whole tree through
//! the configured [`Storage`] before returning.

mod error;
mod node;
mod path;
pub mod seed;
pub mod storage;

pub use error::FsError;
pub use node::{DIR_PERMISSIONS, DIR_SIZE, FILE_PERMISSIONS, Metadata, Node, now_millis};
pub use path::VPath;
pub use storage::{JsonFileStorage, MemoryStorage, Storage};

use log::{error, info, warn};
use std::fmt;

/// How `write_file` treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Directory,
    File,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub node_type: NodeType,
    pub size: usize,
    pub created_at: i64,
    pub modified_at: i64,
    pub permissions: String,
}

/// Directory entry returned by [`FileSystem::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

pub struct FileSystem {
    root: Node,
    storage: Box<dyn Storage>,
}

impl FileSystem {
    /// Wrap an existing tree without saving it.
    pub fn new(root: Node, storage: Box<dyn Storage>) -> Self {
        Self { root, storage }
    }

    /// Restore the persisted tree, or build one with `fallback` and save it.
    ///
    /// A persisted document that fails to parse, or whose root is not a
    /// directory, is treated as absent.
    pub fn load(storage: Box<dyn Storage>, fallback: impl FnOnce() -> Node) -> Self {
        let persisted = match storage.load() {
            Ok(Some(root)) if root.is_directory() => Some(root),
            Ok(Some(_)) => {
                warn!("Persisted filesystem root is not a directory, falling back");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Corrupt persisted filesystem, falling back: {:#}", e);
                None
            }
        };

        match persisted {
            Some(root) => {
                info!("Loaded filesystem from storage");
                Self { root, storage }
            }
            None => {
                let fs = Self {
                    root: fallback(),
                    storage,
                };
                fs.persist();
                fs
            }
        }
    }

    /// Drop the persisted state and start over from `root`.
    pub fn reset(&mut self, root: Node) {
        if let Err(e) = self.storage.clear() {
            error!("Failed to clear persisted filesystem: {:#}", e);
        }
        self.root = root;
        self.persist();
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn resolve_path(path: &str, cwd: &str) -> VPath {
        VPath::resolve(path, cwd)
    }

    /// Walk from the root; any non-directory along the way yields `None`.
    pub fn get_node(&self, path: &VPath) -> Option<&Node> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.children()?.get(segment)?;
        }
        Some(current)
    }

    fn get_node_mut(&mut self, path: &VPath) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current.children_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    pub fn read_file(&self, path: &str, cwd: &str) -> Result<String, FsError> {
        match self.get_node(&VPath::resolve(path, cwd)) {
            None => Err(FsError::NotFound(path.to_string())),
            Some(Node::Directory { .. }) => Err(FsError::IsADirectory(path.to_string())),
            Some(Node::File { content, .. }) => Ok(content.clone()),
        }
    }

    /// Entry names of a directory, sorted.
    pub fn read_dir(&self, path: &str, cwd: &str) -> Result<Vec<String>, FsError> {
        Ok(self
            .list_dir(path, cwd)?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Like [`read_dir`](Self::read_dir) but also reports which entries are directories.
    pub fn list_dir(&self, path: &str, cwd: &str) -> Result<Vec<DirEntry>, FsError> {
        let node = self
            .get_node(&VPath::resolve(path, cwd))
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        let children = node
            .children()
            .ok_or_else(|| FsError::NotADirectory(path.to_string()))?;

        Ok(children
            .iter()
            .map(|(name, child)| DirEntry {
                name: name.clone(),
                is_dir: child.is_directory(),
            })
            .collect())
    }

    pub fn write_file(
        &mut self,
        path: &str,
        content: &str,
        cwd: &str,
        mode: WriteMode,
    ) -> Result<(), FsError> {
        let target = VPath::resolve(path, cwd);

        match self.get_node_mut(&target) {
            Some(Node::Directory { .. }) => return Err(FsError::IsADirectory(path.to_string())),
            Some(Node::File {
                content: existing,
                metadata,
                ..
            }) => {
                match mode {
                    WriteMode::Overwrite => *existing = content.to_string(),
                    WriteMode::Append => existing.push_str(content),
                }
                metadata.modified_at = now_millis();
            }
            None => {
                let name = target
                    .name()
                    .ok_or_else(|| FsError::IsADirectory(path.to_string()))?
                    .to_string();
                let children = self.parent_children_mut(&target, path)?;
                children.insert(name.clone(), Node::file(&name, content));
            }
        }

        self.persist();
        Ok(())
    }

    pub fn create_directory(&mut self, path: &str, cwd: &str) -> Result<(), FsError> {
        let target = VPath::resolve(path, cwd);
        if self.get_node(&target).is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }

        let name = target
            .name()
            .ok_or_else(|| FsError::AlreadyExists(path.to_string()))?
            .to_string();
        let children = self.parent_children_mut(&target, path)?;
        children.insert(name.clone(), Node::directory(&name));

        self.persist();
        Ok(())
    }

    /// Create `path` and any missing ancestors (`mkdir -p`).
    pub fn create_dir_all(&mut self, path: &str, cwd: &str) -> Result<(), FsError> {
        let target = VPath::resolve(path, cwd);
        let mut current = VPath::root();
        let mut created = false;

        for segment in target.segments() {
            current = current.join(segment);
            match self.get_node(&current) {
                Some(Node::Directory { .. }) => {}
                Some(Node::File { .. }) => return Err(FsError::NotADirectory(current.to_string())),
                None => {
                    let children = self.parent_children_mut(&current, path)?;
                    children.insert(segment.clone(), Node::directory(segment));
                    created = true;
                }
            }
        }

        if created {
            self.persist();
        }
        Ok(())
    }

    pub fn delete(&mut self, path: &str, recursive: bool, cwd: &str) -> Result<(), FsError> {
        let target = VPath::resolve(path, cwd);
        let Some(name) = target.name().map(str::to_string) else {
            return Err(FsError::RootRemoval);
        };

        let node = self
            .get_node(&target)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        if let Some(children) = node.children() {
            if !children.is_empty() && !recursive {
                return Err(FsError::DirectoryNotEmpty(path.to_string()));
            }
        }

        let children = self.parent_children_mut(&target, path)?;
        children.remove(&name);

        self.persist();
        Ok(())
    }

    pub fn stat(&self, path: &str, cwd: &str) -> Result<Stat, FsError> {
        let node = self
            .get_node(&VPath::resolve(path, cwd))
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        let metadata = node.metadata();

        Ok(Stat {
            name: node.name().to_string(),
            node_type: if node.is_directory() {
                NodeType::Directory
            } else {
                NodeType::File
            },
            size: node.size(),
            created_at: metadata.created_at,
            modified_at: metadata.modified_at,
            permissions: metadata.permissions.clone(),
        })
    }

    pub fn exists(&self, path: &str, cwd: &str) -> bool {
        self.get_node(&VPath::resolve(path, cwd)).is_some()
    }

    pub fn is_directory(&self, path: &str, cwd: &str) -> bool {
        matches!(
            self.get_node(&VPath::resolve(path, cwd)),
            Some(Node::Directory { .. })
        )
    }

    /// Move `from` to exactly `to`, replacing an existing file there.
    pub fn rename(&mut self, from: &str, to: &str, cwd: &str) -> Result<(), FsError> {
        let source = VPath::resolve(from, cwd);
        let dest = VPath::resolve(to, cwd);

        let Some(source_name) = source.name().map(str::to_string) else {
            return Err(FsError::InvalidMove(from.to_string()));
        };
        let source_is_dir = self
            .get_node(&source)
            .ok_or_else(|| FsError::NotFound(from.to_string()))?
            .is_directory();
        if source == dest {
            return Ok(());
        }
        if dest.starts_with(&source) {
            return Err(FsError::InvalidMove(from.to_string()));
        }

        let dest_name = dest
            .name()
            .ok_or_else(|| FsError::IsADirectory(to.to_string()))?
            .to_string();
        match self.get_node(&dest) {
            Some(Node::Directory { .. }) => return Err(FsError::IsADirectory(to.to_string())),
            Some(Node::File { .. }) if source_is_dir => {
                return Err(FsError::NotADirectory(to.to_string()));
            }
            _ => {}
        }
        // Validate the destination parent before detaching anything.
        self.parent_children_mut(&dest, to)?;

        let mut node = self
            .parent_children_mut(&source, from)?
            .remove(&source_name)
            .ok_or_else(|| FsError::NotFound(from.to_string()))?;
        node.set_name(&dest_name);
        self.parent_children_mut(&dest, to)?.insert(dest_name, node);

        self.persist();
        Ok(())
    }

    fn parent_children_mut(
        &mut self,
        target: &VPath,
        path: &str,
    ) -> Result<&mut std::collections::BTreeMap<String, Node>, FsError> {
        let parent = target
            .parent()
            .ok_or_else(|| FsError::ParentMissing(path.to_string()))?;
        self.get_node_mut(&parent)
            .and_then(Node::children_mut)
            .ok_or_else(|| FsError::ParentMissing(path.to_string()))
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.root) {
            error!("Failed to persist filesystem: {:#}", e);
        }
    }
}
