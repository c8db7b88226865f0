use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Location of a file or folder relative to a sync root, kept as a list of path segments.
///
/// Two trees are compared by putting their `RelPath`s in hash sets, so equality is plain
/// segment-by-segment equality. Ordering is segment-wise as well, which keeps a parent
/// directly ahead of its children when a list of paths is sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath {
    segments: Vec<OsString>,
}

impl RelPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn child(&self, name: &OsStr) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Self { segments }
    }

    /// Number of segments, `a/b/c` has depth 3.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn join_to(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        path
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Strips a single trailing and then a single leading double quote from a raw path argument.
///
/// Shells on some platforms hand over `"C:\some dir\"` with the quotes still attached.
pub fn clean_path(raw: &str) -> String {
    let trimmed = raw.strip_suffix('"').unwrap_or(raw);
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_strips_one_quote_each_side() {
        assert_eq!(clean_path("\"/tmp/src\""), "/tmp/src");
        assert_eq!(clean_path("/tmp/src\""), "/tmp/src");
        assert_eq!(clean_path("\"/tmp/src"), "/tmp/src");
        assert_eq!(clean_path("\"\"/tmp/src\"\""), "\"/tmp/src\"");
        assert_eq!(clean_path("/tmp/src"), "/tmp/src");
        assert_eq!(clean_path("\""), "");
    }

    #[test]
    fn equality_is_segment_wise() {
        let a = RelPath::new(["a", "b"]);
        let b = RelPath::new(["a"]).child(OsStr::new("b"));
        assert_eq!(a, b);
        assert_ne!(a, RelPath::new(["a/b"]));
        assert_eq!(a.depth(), 2);
        assert_eq!(RelPath::default().depth(), 0);
    }

    #[test]
    fn parents_sort_before_children() {
        let mut paths = vec![
            RelPath::new(["a", "b", "c"]),
            RelPath::new(["b"]),
            RelPath::new(["a"]),
            RelPath::new(["a", "b"]),
        ];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a", "a/b", "a/b/c", "b"]);
    }

    #[test]
    fn join_and_child() {
        let rel = RelPath::new(["a"]).child(OsStr::new("file.txt"));
        assert_eq!(
            rel.join_to(Path::new("/dst")),
            PathBuf::from("/dst/a/file.txt")
        );
    }
}
