//! Plain-text log of finished games, one `<n>. <outcome>` line per game.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gambit_types::Outcome;

#[derive(Debug, thiserror::Error)]
pub enum ResultLogError {
    #[error("failed to read result log {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write result log {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ResultLogError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ResultLogError::Read { path, .. } | ResultLogError::Write { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultEntry {
    number: usize,
    outcome: Outcome,
}

impl ResultEntry {
    #[must_use]
    pub const fn number(self) -> usize {
        self.number
    }

    #[must_use]
    pub const fn outcome(self) -> Outcome {
        self.outcome
    }

    fn parse(line: &str) -> Option<Self> {
        let (number, label) = line.trim().split_once(". ")?;
        Some(Self {
            number: number.parse().ok()?,
            outcome: Outcome::from_label(label)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `outcome`, numbered after the non-empty lines already present.
    pub fn append(&self, outcome: Outcome) -> Result<ResultEntry, ResultLogError> {
        let existing = self
            .read()?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();
        let entry = ResultEntry {
            number: existing + 1,
            outcome,
        };

        let write_err = |source: io::Error| ResultLogError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{}. {}", entry.number, outcome.label()).map_err(write_err)?;

        tracing::info!("Recorded game {}: {outcome}", entry.number);
        Ok(entry)
    }

    /// Every parseable entry, in file order. A missing file is an empty log.
    pub fn entries(&self) -> Result<Vec<ResultEntry>, ResultLogError> {
        Ok(self.read()?.lines().filter_map(ResultEntry::parse).collect())
    }

    fn read(&self) -> Result<String, ResultLogError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(ResultLogError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("results.txt"));
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn append_numbers_sequentially() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("nested").join("results.txt"));

        assert_eq!(log.append(Outcome::WhiteWins).unwrap().number(), 1);
        assert_eq!(log.append(Outcome::Draw).unwrap().number(), 2);
        assert_eq!(log.append(Outcome::BlackWins).unwrap().number(), 3);

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "1. White wins\n2. Draw\n3. Black wins\n");
    }

    #[test]
    fn numbering_counts_non_empty_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        fs::write(&path, "1. Draw\n\n2. White wins\n   \n").unwrap();

        let log = ResultLog::new(&path);
        assert_eq!(log.append(Outcome::BlackWins).unwrap().number(), 3);
    }

    #[test]
    fn entries_skip_unparseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        fs::write(&path, "1. White wins\ngarbage\n2. Resigned\n3. Draw\n").unwrap();

        let entries = ResultLog::new(&path).entries().unwrap();
        let outcomes: Vec<_> = entries.iter().map(|e| (e.number(), e.outcome())).collect();
        assert_eq!(outcomes, [(1, Outcome::WhiteWins), (3, Outcome::Draw)]);
    }

    #[test]
    fn unreadable_path_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let log = ResultLog::new(dir.path());
        let err = log.entries().unwrap_err();
        assert_eq!(err.path(), dir.path());
    }
}
