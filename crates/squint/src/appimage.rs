//! The AppImage handle: a validated (path, format) pair.

use std::path::{Path, PathBuf};

use squint_events::{DiagnosticSink, TracingSink};

use crate::{
    elf,
    error::{PackageError, Result},
    formats::{detect_format, Format},
    listing::FilesIterator,
};

/// A file recognized as an AppImage.
///
/// Construction runs format detection exactly once; the detected format is
/// never recomputed and [`AppImage::format`] is stable for the handle's
/// lifetime. The underlying file is not held open: payload-offset and
/// listing queries re-open it on every call, so results always reflect
/// current on-disk content.
#[derive(Debug, Clone)]
pub struct AppImage {
    path: PathBuf,
    format: Format,
}

impl AppImage {
    /// Opens `path` as an AppImage, detecting its format.
    ///
    /// Heuristic-recovery diagnostics go to the `tracing` warn stream; use
    /// [`AppImage::with_sink`] to route them elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::UnknownFormat`] if the file carries no known
    /// AppImage signature, or [`PackageError::IoError`] if it cannot be
    /// read.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_sink(path, &TracingSink)
    }

    /// Like [`AppImage::new`], with detection diagnostics sent to `sink`.
    pub fn with_sink<P: AsRef<Path>>(path: P, sink: &dyn DiagnosticSink) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        match detect_format(&path, sink)? {
            Format::Unknown => Err(PackageError::UnknownFormat { path }),
            format => Ok(Self { path, format }),
        }
    }

    /// Returns the path this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the detected format, always [`Format::Type1`] or
    /// [`Format::Type2`].
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the byte offset at which the payload begins: the total size
    /// of the leading ELF runtime.
    ///
    /// The result is not cached; every call re-parses the ELF header.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::InvalidElf`] if the leading bytes cannot be
    /// parsed as an ELF header. That can happen even on a successfully
    /// classified handle: format detection and size computation validate
    /// disjoint regions of the file.
    pub fn payload_offset(&self) -> Result<u64> {
        elf::stub_size(&self.path)
    }

    /// Returns an iterator over the payload's entry paths.
    ///
    /// Each call yields an independent traversal that opens the file on
    /// its first `next()`.
    pub fn files(&self) -> FilesIterator {
        FilesIterator::new(&self.path, self.format)
    }
}
