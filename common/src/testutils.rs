use std::collections::HashSet;
use std::path::Path;

use crate::path::RelPath;

/// `"a/b/c"` -> `RelPath(["a", "b", "c"])`.
pub fn rel(path: &str) -> RelPath {
    RelPath::new(path.split('/'))
}

pub fn rels(paths: &[&str]) -> HashSet<RelPath> {
    paths.iter().map(|path| rel(path)).collect()
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}
