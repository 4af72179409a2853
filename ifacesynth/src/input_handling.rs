// Input handling for the ifacesynth binary and library
// Expands file arguments and abstracts how source bytes are read

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::debug;

/// Source of Go file contents
pub trait SourceReader {
    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads sources from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

impl<R: SourceReader + ?Sized> SourceReader for &R {
    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read_source(path)
    }
}

fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand `--file` arguments into concrete paths.
///
/// Arguments containing glob metacharacters are expanded (matches sorted);
/// anything else is taken literally so that a missing file surfaces as a
/// read error later. Duplicates keep their first position.
pub fn expand_file_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, InputError> {
    let mut files = IndexSet::new();
    for pattern in patterns {
        if !is_glob_pattern(pattern) {
            files.insert(PathBuf::from(pattern));
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| InputError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.msg.to_string(),
        })?;
        let mut matched = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matched.push(path),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(InputError::UnreadableMatch {
                        path,
                        error: io::Error::from(e),
                    });
                }
            }
        }
        matched.sort();
        debug!("pattern {} matched {} file(s)", pattern, matched.len());
        files.extend(matched);
    }
    Ok(files.into_iter().collect())
}

/// Errors that can occur during input handling
#[derive(Debug)]
pub enum InputError {
    /// Glob pattern could not be compiled
    InvalidPattern { pattern: String, message: String },
    /// A path matched by a pattern could not be inspected
    UnreadableMatch { path: PathBuf, error: io::Error },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::InvalidPattern { pattern, message } => {
                write!(f, "invalid file pattern '{}': {}", pattern, message)
            }
            InputError::UnreadableMatch { path, error } => {
                write!(f, "error reading '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::UnreadableMatch { error, .. } => Some(error),
            InputError::InvalidPattern { .. } => None,
        }
    }
}
