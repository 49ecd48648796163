// Commit list
//
// Ordered commit ids, oldest first, so that a larger ordinal always means a
// later point in history. Ordinal `n` is simply the n-th entry.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Length of a full SHA-1 commit id in hex.
const SHA1_HEX_LEN: usize = 40;

/// Length of a full SHA-256 commit id in hex.
const SHA256_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitList {
    commits: Vec<String>,
}

impl CommitList {
    pub fn new(commits: Vec<String>) -> Self {
        Self { commits }
    }

    /// Parse newline/whitespace separated ids. A run of concatenated full ids
    /// (no separators) is split back into ids; SHA-1 wins when the length fits
    /// both widths.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut commits = Vec::new();

        for token in contents.split_whitespace() {
            if !token.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("Invalid commit id in commit list: {}", token);
            }

            let id_len = match token.len() {
                SHA1_HEX_LEN | SHA256_HEX_LEN => token.len(),
                n if n % SHA1_HEX_LEN == 0 => SHA1_HEX_LEN,
                n if n % SHA256_HEX_LEN == 0 => SHA256_HEX_LEN,
                n => bail!(
                    "Commit id of length {} is neither a full id nor a run of full ids: {}",
                    n,
                    token
                ),
            };
            commits.extend(
                token
                    .as_bytes()
                    .chunks(id_len)
                    .map(|chunk| String::from_utf8_lossy(chunk).into_owned()),
            );
        }

        Ok(Self { commits })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read commit list {} (run with --generate first)",
                path.display()
            )
        })?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse commit list {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.commits.join("\n"))
            .with_context(|| format!("Failed to write commit list: {}", path.display()))?;
        info!(
            count = self.commits.len(),
            "Commits collected and saved to '{}'",
            path.display()
        );
        Ok(())
    }

    /// Commit id at ordinal `n`.
    pub fn commit_at(&self, n: i64) -> Result<&str> {
        usize::try_from(n)
            .ok()
            .and_then(|i| self.commits.get(i))
            .map(String::as_str)
            .with_context(|| {
                format!(
                    "Commit ordinal {} out of range (commit list has {} entries)",
                    n,
                    self.commits.len()
                )
            })
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Ordinal of the newest commit, if any.
    pub fn last_ordinal(&self) -> Option<i64> {
        self.commits.len().checked_sub(1).map(|i| i as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sha(c: char) -> String {
        std::iter::repeat(c).take(SHA1_HEX_LEN).collect()
    }

    #[test]
    fn test_parse_lines() {
        let contents = format!("{}\n{}\n{}", sha('a'), sha('b'), sha('c'));
        let list = CommitList::parse(&contents).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.commit_at(0).unwrap(), sha('a'));
        assert_eq!(list.commit_at(2).unwrap(), sha('c'));
        assert_eq!(list.last_ordinal(), Some(2));
    }

    #[test]
    fn test_parse_concatenated() {
        let contents = format!("{}{}{}", sha('1'), sha('2'), sha('3'));
        let list = CommitList::parse(&contents).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.commit_at(1).unwrap(), sha('2'));
    }

    #[test]
    fn test_parse_sha256_ids() {
        let wide = |c: char| std::iter::repeat(c).take(SHA256_HEX_LEN).collect::<String>();

        let list = CommitList::parse(&format!("{}\n{}", wide('a'), wide('b'))).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.commit_at(1).unwrap(), wide('b'));

        let list = CommitList::parse(&format!("{}{}", wide('c'), wide('d'))).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.commit_at(0).unwrap(), wide('c'));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CommitList::parse("not-a-hash").is_err());
        // Hex, but not a whole number of ids.
        assert!(CommitList::parse("abc123").is_err());
        assert!(CommitList::parse(&format!("{}ff", sha('a'))).is_err());
    }

    #[test]
    fn test_out_of_range_ordinals() {
        let list = CommitList::new(vec![sha('a')]);
        assert!(list.commit_at(0).is_ok());
        assert!(list.commit_at(1).is_err());
        assert!(list.commit_at(-1).is_err());
        assert!(CommitList::default().last_ordinal().is_none());
    }

    #[test]
    fn test_save_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commit_logs");
        let list = CommitList::new(vec![sha('d'), sha('e')]);
        list.save(&path).unwrap();
        assert_eq!(CommitList::load(&path).unwrap(), list);
    }

    #[test]
    fn test_load_missing_mentions_generate() {
        let dir = TempDir::new().unwrap();
        let err = CommitList::load(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("--generate"));
    }
}
