//! Format-aware listing of AppImage payload entries.

pub(crate) mod iso9660;
pub(crate) mod squashfs;

use std::{
    path::{Path, PathBuf},
    vec,
};

use crate::{
    error::{PackageError, Result},
    formats::Format,
};
use self::iso9660::Iso9660Walker;

/// Lazy iterator over the entry paths of an AppImage payload.
///
/// Construction performs no I/O; the payload filesystem is opened on the
/// first call to `next()`. Each iterator is an independent traversal, so
/// consuming one does not affect another obtained from the same handle.
/// A traversal failure is yielded as a single `Err` item, after which the
/// iterator is exhausted.
pub struct FilesIterator {
    path: PathBuf,
    format: Format,
    state: State,
}

enum State {
    Pending,
    Iso9660(Iso9660Walker),
    Squashfs(vec::IntoIter<PathBuf>),
    Done,
}

impl FilesIterator {
    /// Creates a listing over `path`, traversed according to `format`.
    pub fn new<P: AsRef<Path>>(path: P, format: Format) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
            state: State::Pending,
        }
    }

    fn start(&self) -> Result<State> {
        match self.format {
            Format::Type1 => Ok(State::Iso9660(Iso9660Walker::open(&self.path)?)),
            Format::Type2 => Ok(State::Squashfs(
                squashfs::entry_paths(&self.path)?.into_iter(),
            )),
            Format::Unknown => Err(PackageError::UnknownFormat {
                path: self.path.clone(),
            }),
        }
    }
}

impl Iterator for FilesIterator {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Pending) {
            match self.start() {
                Ok(state) => self.state = state,
                Err(err) => {
                    self.state = State::Done;
                    return Some(Err(err));
                }
            }
        }

        let item = match &mut self.state {
            State::Pending | State::Done => None,
            State::Iso9660(walker) => walker.next(),
            State::Squashfs(paths) => paths.next().map(Ok),
        };

        match item {
            Some(Err(err)) => {
                self.state = State::Done;
                Some(Err(err))
            }
            Some(entry) => Some(entry),
            None => {
                self.state = State::Done;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_construction_does_no_io() {
        // the path does not exist, yet the iterator constructs fine
        let mut files = FilesIterator::new("/path/to/nonexistent.AppImage", Format::Type1);

        let first = files.next().unwrap();
        assert!(matches!(first, Err(PackageError::IoError { .. })));
        assert!(files.next().is_none());
    }

    #[test]
    fn test_unknown_format_yields_single_error() {
        let file = test_utils::write_temp(&[0u8; 64]);
        let mut files = FilesIterator::new(file.path(), Format::Unknown);

        let first = files.next().unwrap();
        assert!(matches!(first, Err(PackageError::UnknownFormat { .. })));
        assert!(files.next().is_none());
    }

    #[test]
    fn test_type1_traversals_are_independent() {
        let file = test_utils::write_temp(&test_utils::iso_image());

        let mut first = FilesIterator::new(file.path(), Format::Type1);
        let mut second = FilesIterator::new(file.path(), Format::Type1);

        let head = first.next().unwrap().unwrap();
        let all: Vec<_> = second.by_ref().map(|entry| entry.unwrap()).collect();
        assert_eq!(all.len(), 3);
        assert!(second.next().is_none());

        let mut rest: Vec<_> = first.map(|entry| entry.unwrap()).collect();
        rest.insert(0, head);
        rest.sort();

        let mut expected = all;
        expected.sort();
        assert_eq!(rest, expected);
    }

    #[test]
    fn test_type2_without_squashfs_payload_errors() {
        let bytes = test_utils::with_type2_magic(test_utils::elf64_header(4096, 64, 4));
        let file = test_utils::write_temp(&bytes);

        let mut files = FilesIterator::new(file.path(), Format::Type2);
        assert!(matches!(files.next(), Some(Err(_))));
        assert!(files.next().is_none());
    }
}
