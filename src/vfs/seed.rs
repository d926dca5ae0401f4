//! Initial tree used when no persisted state exists.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::vfs::{FileSystem, MemoryStorage, Node, WriteMode};

/// Where the default tree places the user and the command units.
pub struct SeedLayout<'a> {
    pub user: &'a str,
    pub home: &'a str,
    pub bin_dir: &'a str,
}

/// Build the built-in default tree.
///
/// `units` are `(file name, content)` pairs installed into `bin_dir`.
pub fn default_tree<I>(layout: &SeedLayout<'_>, units: I) -> Node
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut fs = FileSystem::new(Node::directory("/"), Box::new(MemoryStorage::new()));

    // The scratch tree starts empty, so these only fail on a bad layout.
    let mut seed = |path: &str, content: Option<String>| {
        let result = match content {
            Some(content) => fs.write_file(path, &content, "/", WriteMode::Overwrite),
            None => fs.create_dir_all(path, "/"),
        };
        if let Err(e) = result {
            log::warn!("Skipping seed entry {}: {}", path, e);
        }
    };

    seed(layout.home, None);
    seed(&format!("{}/projects", layout.home), None);
    seed(layout.bin_dir, None);
    seed(
        &format!("{}/about.md", layout.home),
        Some(format!(
            "# {}\n\nThis home directory lives inside a virtual filesystem.\n",
            layout.user
        )),
    );
    seed(
        &format!("{}/readme.md", layout.home),
        Some(
            "Type `help` to list commands. Pipes (`|`) and redirections \
             (`>`, `>>`, `<`, `2>&1`) work like a regular shell.\n"
                .to_string(),
        ),
    );

    for (name, content) in units {
        seed(&format!("{}/{}", layout.bin_dir, name), Some(content));
    }

    fs.into_root()
}

/// Read a seed tree exported as JSON (same shape as the persisted state).
pub fn from_json_file(path: &Path) -> Result<Node> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let root: Node = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
    if !root.is_directory() {
        bail!("Seed file root must be a directory: {}", path.display());
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_tree_layout() {
        let layout = SeedLayout {
            user: "guest",
            home: "/home/guest",
            bin_dir: "/home/guest/.local/bin",
        };
        let units = vec![("echo.cmd".to_string(), "#!vsh echo\n".to_string())];
        let fs = FileSystem::new(default_tree(&layout, units), Box::new(MemoryStorage::new()));

        assert!(fs.is_directory("/home/guest/projects", "/"));
        assert!(fs.read_file("/home/guest/about.md", "/").unwrap().contains("guest"));
        assert_eq!(
            fs.read_file("/home/guest/.local/bin/echo.cmd", "/").unwrap(),
            "#!vsh echo\n"
        );
    }

    #[test]
    fn test_seed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(
            &path,
            r#"{"type":"directory","name":"/","children":{"motd":{"type":"file","name":"motd","content":"hi"}}}"#,
        )
        .unwrap();
        let root = from_json_file(&path).unwrap();
        assert_eq!(root.children().unwrap()["motd"].size(), 2);

        fs::write(&path, r#"{"type":"file","name":"x"}"#).unwrap();
        assert!(from_json_file(&path).is_err());
    }
}
