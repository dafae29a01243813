//! Local bundle of liblouis table files.
//!
//! Tables are pulled from the upstream repository one file at a time and every
//! `include` directive is followed so the bundle is self-contained.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const TABLES_BASE_URL: &str =
    "https://raw.githubusercontent.com/liblouis/liblouis/master/tables/";

/// Extensions counted as table, display or character-definition files.
pub const TABLE_EXTENSIONS: [&str; 4] = ["ctb", "utb", "uti", "dis"];

/// Where missing table files come from.
pub trait TableSource {
    fn fetch(&self, name: &str) -> Result<String>;
}

pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create table dir: {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Add tables and everything they include. Returns the names that were fetched;
    /// files already present are not fetched again but their includes are still walked.
    pub fn add(&self, names: &[String], source: &dyn TableSource) -> Result<Vec<String>> {
        let mut visited = HashSet::new();
        let mut fetched = Vec::new();
        for name in names {
            self.add_one(name, source, &mut visited, &mut fetched)?;
        }
        Ok(fetched)
    }

    fn add_one(
        &self,
        name: &str,
        source: &dyn TableSource,
        visited: &mut HashSet<String>,
        fetched: &mut Vec<String>,
    ) -> Result<()> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }
        let path = self.path_for(name)?;

        let text = if path.exists() {
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?
        } else {
            let text = source
                .fetch(name)
                .with_context(|| format!("Failed to download {}", name))?;
            fs::write(&path, &text).with_context(|| format!("Failed to write {:?}", path))?;
            info!("downloaded {}", name);
            fetched.push(name.to_string());
            text
        };

        for dep in parse_includes(&text) {
            self.add_one(&dep, source, visited, fetched)?;
        }
        Ok(())
    }

    /// Delete the named files. Returns the names that were actually removed.
    pub fn remove(&self, names: &[String]) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for name in names {
            let path = self.path_for(name)?;
            if path.exists() {
                fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
                info!("removed {}", name);
                removed.push(name.clone());
            } else {
                warn!("(not found) {}", name);
            }
        }
        Ok(removed)
    }

    /// Table files in the bundle, sorted by name.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_table_file(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Remove every table file, returning how many went.
    pub fn clear(&self) -> Result<usize> {
        let files = self.list()?;
        for name in &files {
            fs::remove_file(self.dir.join(name))
                .with_context(|| format!("Failed to remove {}", name))?;
        }
        Ok(files.len())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let candidate = Path::new(name);
        let plain = candidate
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        if name.is_empty() || !plain {
            bail!("Refusing table name outside the bundle: {:?}", name);
        }
        Ok(self.dir.join(candidate))
    }
}

fn is_table_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TABLE_EXTENSIONS.contains(&ext))
}

/// File names referenced by `include` lines.
///
/// Only the token right after the keyword counts; trailing comments and
/// punctuation are dropped.
pub fn parse_includes(text: &str) -> Vec<String> {
    let mut includes = Vec::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        if !keyword.eq_ignore_ascii_case("include") {
            continue;
        }
        let Some(token) = tokens.next() else {
            continue;
        };
        let token = token.split(['#', ';']).next().unwrap_or_default();
        let token = token.trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
        if !token.is_empty() {
            includes.push(token.to_string());
        }
    }
    includes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_lines_are_picked_out() {
        let text = "\
# comment include nothing.ctb
include chardefs.cti
  INCLUDE braille-patterns.cti # trailing comment
include latinLetterDef6Dots.uti;
space \\s 0
include
";
        assert_eq!(
            parse_includes(text),
            vec![
                "chardefs.cti",
                "braille-patterns.cti",
                "latinLetterDef6Dots.uti"
            ]
        );
    }

    #[test]
    fn include_token_stops_at_comment_marker() {
        assert_eq!(parse_includes("include a.ctb#x"), vec!["a.ctb"]);
    }

    #[test]
    fn table_extensions() {
        assert!(is_table_file(Path::new("en-us-g2.ctb")));
        assert!(is_table_file(Path::new("unicode.dis")));
        assert!(!is_table_file(Path::new("chardefs.cti")));
        assert!(!is_table_file(Path::new("README")));
    }
}
