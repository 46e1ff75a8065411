//! Error types for AppImage inspection.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while inspecting an AppImage.
#[derive(Error, Diagnostic, Debug)]
pub enum PackageError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(squint::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    /// The file carries none of the known AppImage signatures.
    #[error("Unknown AppImage format: {}", path.display())]
    #[diagnostic(code(squint::format))]
    UnknownFormat { path: PathBuf },

    /// The leading bytes of the file are not a parseable ELF header.
    #[error("Invalid ELF header in {}: {reason}", path.display())]
    #[diagnostic(code(squint::elf))]
    InvalidElf { path: PathBuf, reason: String },

    /// The Type 1 payload is not a readable ISO 9660 image.
    #[error("Invalid ISO 9660 image {}: {reason}", path.display())]
    #[diagnostic(code(squint::iso9660))]
    InvalidIso9660 { path: PathBuf, reason: String },

    #[error(transparent)]
    #[diagnostic(code(squint::squashfs))]
    SquashfsError(#[from] squishy::error::SquishyError),
}

/// A specialized Result type for AppImage inspection.
pub type Result<T> = std::result::Result<T, PackageError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            PackageError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
