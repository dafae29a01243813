use std::path::{Path, PathBuf};

/// Subdirectories of a data path where liblouis keeps its tables.
const TABLE_SUBDIRS: [&str; 2] = ["tables", "liblouis/tables"];

/// Turns table ids into paths under a known tables directory.
///
/// A table id may be a comma-separated list. Absolute entries are kept; relative
/// entries are joined to the tables directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResolver {
    tables_dir: PathBuf,
}

impl TableResolver {
    pub fn new(tables_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables_dir: tables_dir.into(),
        }
    }

    /// Locate the tables directory under `data_path`, if there is one.
    pub fn for_data_path(data_path: &Path) -> Option<Self> {
        TABLE_SUBDIRS
            .iter()
            .map(|sub| data_path.join(sub))
            .find(|dir| dir.is_dir())
            .map(Self::new)
    }

    pub fn tables_dir(&self) -> &Path {
        &self.tables_dir
    }

    pub fn resolve(&self, table: &str) -> String {
        table
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                if Path::new(name).is_absolute() {
                    name.to_string()
                } else {
                    self.tables_dir.join(name).to_string_lossy().into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_entries_join_tables_dir() {
        let resolver = TableResolver::new("/data/tables");
        assert_eq!(resolver.resolve("en-us-g2.ctb"), "/data/tables/en-us-g2.ctb");
    }

    #[test]
    fn lists_are_trimmed_and_absolute_entries_kept() {
        let resolver = TableResolver::new("/data/tables");
        assert_eq!(
            resolver.resolve(" unicode.dis , /opt/custom.ctb,en-us-g1.ctb"),
            "/data/tables/unicode.dis,/opt/custom.ctb,/data/tables/en-us-g1.ctb"
        );
    }

    #[test]
    fn empty_entries_are_dropped() {
        let resolver = TableResolver::new("/t");
        assert_eq!(resolver.resolve("a.ctb,,"), "/t/a.ctb");
    }

    #[test]
    fn finds_tables_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(TableResolver::for_data_path(root.path()), None);

        let nested = root.path().join("liblouis").join("tables");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            TableResolver::for_data_path(root.path()).map(|r| r.tables_dir().to_path_buf()),
            Some(nested)
        );

        let direct = root.path().join("tables");
        std::fs::create_dir_all(&direct).unwrap();
        assert_eq!(
            TableResolver::for_data_path(root.path()).map(|r| r.tables_dir().to_path_buf()),
            Some(direct)
        );
    }
}
