use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DIR_PERMISSIONS: &str = "drwxr-xr-x";
pub const FILE_PERMISSIONS: &str = "-rw-r--r--";

/// Reported size of a directory, as `ls -l` shows it.
pub const DIR_SIZE: usize = 4096;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub created_at: i64,
    pub modified_at: i64,
    pub permissions: String,
}

impl Metadata {
    fn fresh(permissions: &str) -> Self {
        let now = now_millis();
        Self {
            created_at: now,
            modified_at: now,
            permissions: permissions.to_string(),
        }
    }

    fn directory() -> Self {
        Self::fresh(DIR_PERMISSIONS)
    }

    fn file() -> Self {
        Self::fresh(FILE_PERMISSIONS)
    }
}

/// One entry of the persisted tree.
///
/// The serialized shape is `{type, name, content|children, metadata}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Directory {
        name: String,
        #[serde(default)]
        children: BTreeMap<String, Node>,
        #[serde(default = "Metadata::directory")]
        metadata: Metadata,
    },
    File {
        name: String,
        #[serde(default)]
        content: String,
        #[serde(default = "Metadata::file")]
        metadata: Metadata,
    },
}

impl Node {
    pub fn directory(name: &str) -> Self {
        Self::Directory {
            name: name.to_string(),
            children: BTreeMap::new(),
            metadata: Metadata::directory(),
        }
    }

    pub fn file(name: &str, content: &str) -> Self {
        Self::File {
            name: name.to_string(),
            content: content.to_string(),
            metadata: Metadata::file(),
        }
    }

    /// Builder used by the seed tree.
    pub fn with_child(mut self, child: Node) -> Self {
        if let Self::Directory { children, .. } = &mut self {
            children.insert(child.name().to_string(), child);
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn set_name(&mut self, new_name: &str) {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => *name = new_name.to_string(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Directory { metadata, .. } | Self::File { metadata, .. } => metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Self::Directory { metadata, .. } | Self::File { metadata, .. } => metadata,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Directory { .. } => DIR_SIZE,
            Self::File { content, .. } => content.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let tree = Node::directory("/").with_child(Node::file("a.txt", "hi"));
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value["type"], "directory");
        assert_eq!(value["name"], "/");
        assert_eq!(value["metadata"]["permissions"], DIR_PERMISSIONS);
        assert!(value["metadata"]["createdAt"].is_i64());

        let child = &value["children"]["a.txt"];
        assert_eq!(child["type"], "file");
        assert_eq!(child["content"], "hi");
        assert_eq!(child["metadata"]["permissions"], FILE_PERMISSIONS);
    }

    #[test]
    fn test_missing_metadata_is_filled() {
        let json = r#"{"type":"directory","name":"/","children":{
            "x":{"type":"file","name":"x","content":"1"}}}"#;
        let tree: Node = serde_json::from_str(json).unwrap();
        let x = &tree.children().unwrap()["x"];
        assert_eq!(x.metadata().permissions, FILE_PERMISSIONS);
        assert_eq!(x.size(), 1);
        assert_eq!(tree.size(), DIR_SIZE);
    }
}
