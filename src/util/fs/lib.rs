/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Thin wrappers around `std::fs` whose errors say which file was involved.

#[macro_use]
extern crate log;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("{action}: '{}'", .path.display())]
pub struct FsError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub type Result<T> = std::result::Result<T, FsError>;

fn context<T>(action: &'static str, path: &Path, result: io::Result<T>) -> Result<T> {
    result.map_err(|source| FsError { action, path: path.to_owned(), source })
}

/// Wrapper around `File::open` that adds context.
pub fn open(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    context("while opening file", path, File::open(path))
}

/// Wrapper around `File::open` that adds context and makes a `BufReader`.
pub fn open_text(path: impl AsRef<Path>) -> Result<BufReader<File>>
{ open(path).map(BufReader::new) }

/// Wrapper around `File::create` that adds context and makes a `BufWriter`.
pub fn create(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    trace!("creating '{}'", path.display());
    context("could not create file", path, File::create(path)).map(BufWriter::new)
}

/// Wrapper around `std::fs::read_to_string` that adds context.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    context("could not read file", path, fs::read_to_string(path))
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_relative(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    match path.as_ref().is_absolute() {
        true => path.as_ref().to_owned(),
        false => base.as_ref().join(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn error_names_path() {
        let dir = tempdir::TempDir::new("dielec-fs-util").unwrap();
        let missing = dir.path().join("BORNINFO");
        let err = open(&missing).unwrap_err();

        assert_eq!(err.path, missing);
        assert!(err.to_string().contains("BORNINFO"));
    }

    #[test]
    fn create_then_read() {
        let dir = tempdir::TempDir::new("dielec-fs-util").unwrap();
        let path = dir.path().join("out.txt");
        {
            let mut file = create(&path).unwrap();
            writeln!(file, "hello").unwrap();
        }
        assert_eq!(read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn relative_paths() {
        assert_eq!(resolve_relative("/a/b", "c"), PathBuf::from("/a/b/c"));
        assert_eq!(resolve_relative("/a/b", "/c"), PathBuf::from("/c"));
    }
}
