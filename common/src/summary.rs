/// Counters for one sync run; in dry-run they count planned actions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub folders_created: usize,
    pub folders_removed: usize,
    pub files_copied: usize,
    pub files_updated: usize,
    pub files_removed: usize,
    pub bytes_copied: u64,
}

impl Summary {
    /// Total number of filesystem actions, the figure dry-run and real runs agree on.
    pub fn actions(&self) -> usize {
        self.folders_created
            + self.folders_removed
            + self.files_copied
            + self.files_updated
            + self.files_removed
    }
}

impl std::ops::Add for Summary {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            folders_created: self.folders_created + other.folders_created,
            folders_removed: self.folders_removed + other.folders_removed,
            files_copied: self.files_copied + other.files_copied,
            files_updated: self.files_updated + other.files_updated,
            files_removed: self.files_removed + other.files_removed,
            bytes_copied: self.bytes_copied + other.bytes_copied,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "folders created: {}\n\
            folders removed: {}\n\
            files copied: {}\n\
            files updated: {}\n\
            files removed: {}\n\
            bytes copied: {}\n",
            self.folders_created,
            self.folders_removed,
            self.files_copied,
            self.files_updated,
            self.files_removed,
            bytesize::ByteSize(self.bytes_copied),
        )
    }
}
