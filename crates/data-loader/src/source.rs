//! Locating and opening the data files.
//!
//! A relative path is tried as given first, then under each configured
//! search root in order. The roots are plain configuration: callers decide
//! where to look, this module never inspects the environment itself.

use crate::error::{DataLoadError, Result};
use crate::types::DataKind;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered list of directories to fall back on when a file is not found
/// at the path it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    roots: Vec<PathBuf>,
}

impl SearchPaths {
    /// No fallback roots: only the path as given is tried
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fallback root (tried after every root added before it)
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every path that `open` would try for `path`, in order
    pub fn candidates(&self, path: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(self.roots.len() + 1);
        candidates.push(path.to_path_buf());
        candidates.extend(self.roots.iter().map(|root| root.join(path)));
        candidates
    }

    /// Open the first candidate that exists.
    ///
    /// Only "not found" moves on to the next candidate; any other I/O error
    /// (permissions, a directory in place of a file, ...) is returned as is.
    pub fn open(&self, path: &Path, kind: DataKind) -> Result<BufReader<File>> {
        let candidates = self.candidates(path);
        for candidate in &candidates {
            match File::open(candidate) {
                Ok(file) => {
                    debug!(kind = %kind, path = %candidate.display(), "opened data file");
                    return Ok(BufReader::new(file));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(DataLoadError::Io { kind, source }),
            }
        }

        Err(DataLoadError::NotFound {
            kind,
            path: path.to_path_buf(),
            tried: candidates,
        })
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(Into::into).collect(),
        }
    }
}
