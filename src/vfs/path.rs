use std::fmt;

/// A resolved location in the virtual tree.
///
/// Segments are never empty and never `.` or `..`; the empty path is the
/// root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VPath(Vec<String>);

impl VPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Resolve `path` against `cwd`.
    ///
    /// A leading `/` ignores `cwd`. `..` pops a segment when there is one and
    /// is a no-op at the root; `.` and empty segments are dropped.
    pub fn resolve(path: &str, cwd: &str) -> Self {
        let mut stack: Vec<String> = if path.starts_with('/') {
            Vec::new()
        } else {
            normalize(cwd)
        };

        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    stack.pop();
                }
                _ => stack.push(part.to_string()),
            }
        }

        Self(stack)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<VPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn join(&self, name: &str) -> VPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Segment-wise prefix test (`/home/a` is not inside `/home/ab`).
    pub fn starts_with(&self, other: &VPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for VPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

fn normalize(cwd: &str) -> Vec<String> {
    let mut stack = Vec::new();
    for part in cwd.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(part.to_string()),
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(p: &VPath) -> Vec<&str> {
        p.segments().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_resolve_relative() {
        let p = VPath::resolve("docs/a.md", "/home/guest");
        assert_eq!(segs(&p), vec!["home", "guest", "docs", "a.md"]);
        assert_eq!(p.to_string(), "/home/guest/docs/a.md");
    }

    #[test]
    fn test_resolve_absolute_ignores_cwd() {
        let p = VPath::resolve("/etc/motd", "/home/guest");
        assert_eq!(segs(&p), vec!["etc", "motd"]);
    }

    #[test]
    fn test_resolve_dots_and_empty_segments() {
        let p = VPath::resolve("./a//b/./../c/", "/x");
        assert_eq!(segs(&p), vec!["x", "a", "c"]);
    }

    #[test]
    fn test_resolve_never_underflows() {
        let p = VPath::resolve("../../../..", "/home");
        assert!(p.is_root());
        assert_eq!(p.to_string(), "/");

        let p = VPath::resolve("/../../etc", "/");
        assert_eq!(segs(&p), vec!["etc"]);
    }

    #[test]
    fn test_parent_and_name() {
        let p = VPath::resolve("/a/b", "/");
        assert_eq!(p.name(), Some("b"));
        assert_eq!(p.parent(), Some(VPath::resolve("/a", "/")));
        assert_eq!(VPath::root().parent(), None);
        assert_eq!(VPath::root().name(), None);
    }

    #[test]
    fn test_starts_with_is_segment_aware() {
        let home = VPath::resolve("/home/ab", "/");
        assert!(VPath::resolve("/home/ab/docs", "/").starts_with(&home));
        assert!(VPath::resolve("/home/ab", "/").starts_with(&home));
        assert!(!VPath::resolve("/home/abc", "/").starts_with(&home));
        assert!(!VPath::resolve("/home", "/").starts_with(&home));
    }
}
