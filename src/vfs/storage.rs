//! Durable storage for the virtual tree.
//!
//! The filesystem calls [`Storage::save`] after every mutation, so adapters
//! always hold a complete snapshot.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::vfs::Node;

pub trait Storage {
    /// Previously saved tree, `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Node>>;
    fn save(&self, root: &Node) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the tree as a single JSON document on the host.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<Node>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let root = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
        Ok(Some(root))
    }

    fn save(&self, root: &Node) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create state directory")?;
            }
        }
        let json = serde_json::to_string(root).context("Failed to serialize filesystem")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove state file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory. Used by tests and `-c` dry runs.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON document, as if it had been saved before.
    pub fn with_snapshot(json: &str) -> Self {
        Self {
            snapshot: RefCell::new(Some(json.to_string())),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Node>> {
        match self.snapshot.borrow().as_deref() {
            Some(json) => Ok(Some(
                serde_json::from_str(json).context("Failed to parse stored snapshot")?,
            )),
            None => Ok(None),
        }
    }

    fn save(&self, root: &Node) -> Result<()> {
        let json = serde_json::to_string(root).context("Failed to serialize filesystem")?;
        *self.snapshot.borrow_mut() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.snapshot.borrow_mut() = None;
        Ok(())
    }
}
