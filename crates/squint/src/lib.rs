//! AppImage format detection and payload inspection.
//!
//! An AppImage is a single file combining a leading ELF runtime with an
//! appended payload filesystem. This crate answers three questions about
//! such files without mounting or extracting anything:
//!
//! - which AppImage format a file uses ([`Format`]),
//! - where its payload begins ([`AppImage::payload_offset`]),
//! - what the payload contains ([`AppImage::files`]).
//!
//! # Supported Formats
//!
//! - **Type 1**: an ISO 9660 image with the ELF runtime embedded in the
//!   32 KiB system area.
//! - **Type 2**: an ELF runtime followed by a SquashFS payload.
//!
//! Files that embed a disk image and an ELF stub but lack the AppImage
//! magic bytes are classified as Type 1 through a structural heuristic; a
//! [`Diagnostic`] is emitted through the configured sink when that
//! happens.
//!
//! # Example
//!
//! ```no_run
//! use squint::{AppImage, Result};
//!
//! fn inspect(path: &str) -> Result<()> {
//!     let appimage = AppImage::new(path)?;
//!
//!     println!("format: {:?}", appimage.format());
//!     println!("payload starts at byte {}", appimage.payload_offset()?);
//!     for entry in appimage.files() {
//!         println!("{}", entry?.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod appimage;
pub mod elf;
pub mod error;
pub mod formats;
pub mod listing;

#[cfg(test)]
mod test_utils;

pub use appimage::AppImage;
pub use elf::stub_size;
pub use error::{ErrorContext, PackageError, Result};
pub use formats::{
    detect_format, Format, ELF_MAGIC_BYTES, ISO9660_MAGIC_BYTES, ISO9660_MAGIC_OFFSETS,
    MAGIC_BYTES_OFFSET, TYPE1_MAGIC_BYTES, TYPE2_MAGIC_BYTES,
};
pub use listing::FilesIterator;
pub use squint_events::{
    ChannelSink, CollectorSink, Diagnostic, DiagnosticSink, NullSink, TracingSink,
};
