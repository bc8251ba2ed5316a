//! Target-filename watch list.
//!
//! Directory listings flag files whose names match a configured list of
//! patterns so the UI can highlight them. Patterns are one per line,
//! case-insensitive, `#` comments and blank lines skipped. A single `*`
//! at the start or end of a pattern makes it a suffix or prefix match;
//! bare patterns longer than three characters also match as substrings.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct TargetList {
    patterns: HashSet<String>,
    source: Option<PathBuf>,
}

impl TargetList {
    /// Load patterns from a file. A missing file is not an error: the
    /// list is simply empty and nothing gets flagged.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let patterns = Self::read_patterns(&path).unwrap_or_else(|e| {
            tracing::warn!("target list {} not loaded: {e:#}", path.display());
            HashSet::new()
        });
        tracing::info!(
            "loaded {} target patterns from {}",
            patterns.len(),
            path.display()
        );
        Self {
            patterns,
            source: Some(path),
        }
    }

    /// Build directly from patterns, mainly for tests.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
            source: None,
        }
    }

    fn read_patterns(path: &Path) -> Result<HashSet<String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect())
    }

    /// Re-read the source file. Returns (old count, new count).
    pub fn reload(&mut self) -> (usize, usize) {
        let old = self.patterns.len();
        if let Some(path) = &self.source {
            self.patterns = Self::read_patterns(path).unwrap_or_default();
        }
        (old, self.patterns.len())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// A few patterns for the debug endpoint.
    pub fn sample(&self, n: usize) -> Vec<String> {
        let mut sample: Vec<String> = self.patterns.iter().take(n).cloned().collect();
        sample.sort();
        sample
    }

    /// Does `filename` match any pattern?
    pub fn matches(&self, filename: &str) -> bool {
        if filename.is_empty() || self.patterns.is_empty() {
            return false;
        }
        let name = filename.to_lowercase();

        if self.patterns.contains(&name) {
            return true;
        }

        // password.txt and passwords.txt are common enough to treat as
        // variants of each other.
        if (name == "passwords.txt" && self.patterns.contains("password.txt"))
            || (name == "password.txt" && self.patterns.contains("passwords.txt"))
        {
            return true;
        }

        for pattern in &self.patterns {
            if pattern.is_empty() {
                continue;
            }
            if let Some(suffix) = pattern.strip_prefix('*') {
                if !suffix.contains('*') && !suffix.is_empty() && name.ends_with(suffix) {
                    return true;
                }
            } else if let Some(prefix) = pattern.strip_suffix('*') {
                if !prefix.contains('*') && !prefix.is_empty() && name.starts_with(prefix) {
                    return true;
                }
            } else if pattern.len() > 3 && name.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn exact_match_is_case_insensitive() {
        let list = TargetList::from_patterns(["Todo.txt"]);
        assert!(list.matches("todo.txt"));
        assert!(list.matches("TODO.TXT"));
        assert!(!list.matches("todo.md"));
    }

    #[test]
    fn password_variants_match_each_other() {
        let list = TargetList::from_patterns(["password.txt"]);
        assert!(list.matches("passwords.txt"));
        let list = TargetList::from_patterns(["passwords.txt"]);
        assert!(list.matches("password.txt"));
    }

    #[test]
    fn suffix_and_prefix_globs() {
        let list = TargetList::from_patterns(["*.kdbx", "wallet*"]);
        assert!(list.matches("vault.kdbx"));
        assert!(list.matches("wallet_backup.dat"));
        assert!(!list.matches("kdbx.txt"));
    }

    #[test]
    fn substring_only_for_longer_patterns() {
        let list = TargetList::from_patterns(["resume"]);
        assert!(list.matches("my_resume_2024.docx"));
        // Three chars or fewer never match as substrings.
        let short = TargetList::from_patterns(["tax"]);
        assert!(!short.matches("syntax.rs"));
        assert!(short.matches("tax")); // still matches exactly
    }

    #[test]
    fn empty_list_matches_nothing() {
        let list = TargetList::default();
        assert!(!list.matches("password.txt"));
        assert!(!list.matches(""));
    }

    #[test]
    fn loads_and_reloads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.txt");
        std::fs::write(&path, "# watch these\npassword.txt\n\n*.kdbx\n").unwrap();

        let mut list = TargetList::load(&path);
        assert_eq!(list.len(), 2);
        assert!(list.matches("password.txt"));

        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        writeln!(f, "seed*").unwrap();
        drop(f);

        let (old, new) = list.reload();
        assert_eq!((old, new), (2, 3));
        assert!(list.matches("seed_phrase.txt"));
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let list = TargetList::load("/definitely/not/here/targets.txt");
        assert!(list.is_empty());
    }
}
