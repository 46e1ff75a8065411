//! AppImage format detection.
//!
//! This module classifies files by reading a handful of fixed byte
//! signatures. Exact format magic always wins; files that merely have the
//! structural shape of a Type 1 AppImage (an embedded ISO 9660 image plus
//! an ELF stub) are recovered as Type 1 with a diagnostic.

pub mod signature;

use std::path::Path;

use squint_events::{Diagnostic, DiagnosticSink};
use tracing::debug;

use crate::error::Result;
use self::signature::SignatureChecker;

/// Magic bytes for ELF executables (at offset 0).
pub const ELF_MAGIC_BYTES: [u8; 4] = [0x7f, 0x45, 0x4c, 0x46];

/// Magic bytes for Type 1 AppImages (at offset 8).
pub const TYPE1_MAGIC_BYTES: [u8; 3] = [0x41, 0x49, 0x01];

/// Magic bytes for Type 2 AppImages (at offset 8).
pub const TYPE2_MAGIC_BYTES: [u8; 3] = [0x41, 0x49, 0x02];

/// Identifier bytes of ISO 9660 volume descriptors ("CD001").
pub const ISO9660_MAGIC_BYTES: [u8; 5] = [0x43, 0x44, 0x30, 0x30, 0x31];

/// Offset of the AppImage magic bytes within the file.
pub const MAGIC_BYTES_OFFSET: u64 = 8;

/// Byte offsets at which the ISO 9660 identifier may appear: the first
/// three volume descriptor sectors, one byte past the descriptor type.
pub const ISO9660_MAGIC_OFFSETS: [u64; 3] = [32769, 34817, 36865];

/// Supported AppImage formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Type 1 AppImage - an ISO 9660 image with an embedded ELF runtime.
    Type1,
    /// Type 2 AppImage - an ELF runtime with an appended SquashFS payload.
    Type2,
    /// Unknown or unsupported format.
    Unknown,
}

/// Detects the AppImage format of a file from its byte signatures.
///
/// Checks are ordered and the first match wins:
///
/// 1. Type 1 magic bytes at offset 8.
/// 2. Type 2 magic bytes at offset 8.
/// 3. ISO 9660 signature together with an ELF signature: the file is
///    treated as a Type 1 AppImage that lacks its magic bytes, and
///    [`Diagnostic::MissingMagicBytes`] is emitted on `sink`.
///
/// Files matching none of the above are [`Format::Unknown`]. Signature
/// evaluation never fails; byte ranges that cannot be read count as
/// signature-absent, so an empty or truncated file is simply `Unknown`.
///
/// # Errors
///
/// Returns [`crate::PackageError::IoError`] if the file cannot be opened.
pub fn detect_format<P: AsRef<Path>>(path: P, sink: &dyn DiagnosticSink) -> Result<Format> {
    let path = path.as_ref();
    let mut checker = SignatureChecker::open(path)?;

    if checker.has_type1_signature() {
        debug!(path = %path.display(), "detected Type 1 magic bytes");
        return Ok(Format::Type1);
    }

    if checker.has_type2_signature() {
        debug!(path = %path.display(), "detected Type 2 magic bytes");
        return Ok(Format::Type2);
    }

    if checker.has_iso9660_signature() && checker.has_elf_signature() {
        sink.emit(Diagnostic::MissingMagicBytes {
            path: path.to_path_buf(),
        });
        return Ok(Format::Type1);
    }

    Ok(Format::Unknown)
}
