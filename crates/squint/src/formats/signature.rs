//! Fixed-offset byte signature checks.

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use super::{
    ELF_MAGIC_BYTES, ISO9660_MAGIC_BYTES, ISO9660_MAGIC_OFFSETS, MAGIC_BYTES_OFFSET,
    TYPE1_MAGIC_BYTES, TYPE2_MAGIC_BYTES,
};
use crate::error::{ErrorContext, Result};

/// Answers yes/no questions about the byte signatures of a single file.
///
/// Opening the checker fails if the file is inaccessible. The individual
/// queries are total: each one reads only the fixed byte range it needs,
/// and a range that cannot be read counts as signature-absent.
pub struct SignatureChecker {
    file: BufReader<File>,
}

impl SignatureChecker {
    /// Opens `path` for signature checks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackageError::IoError`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

        Ok(Self {
            file: BufReader::new(file),
        })
    }

    /// Whether the file carries the Type 1 AppImage magic bytes.
    pub fn has_type1_signature(&mut self) -> bool {
        self.matches_at(MAGIC_BYTES_OFFSET, &TYPE1_MAGIC_BYTES)
    }

    /// Whether the file carries the Type 2 AppImage magic bytes.
    pub fn has_type2_signature(&mut self) -> bool {
        self.matches_at(MAGIC_BYTES_OFFSET, &TYPE2_MAGIC_BYTES)
    }

    /// Whether the file contains an ISO 9660 volume descriptor identifier
    /// in any of the first three descriptor sectors.
    pub fn has_iso9660_signature(&mut self) -> bool {
        ISO9660_MAGIC_OFFSETS
            .iter()
            .any(|&offset| self.matches_at(offset, &ISO9660_MAGIC_BYTES))
    }

    /// Whether the file starts with the ELF magic bytes.
    pub fn has_elf_signature(&mut self) -> bool {
        self.matches_at(0, &ELF_MAGIC_BYTES)
    }

    fn matches_at(&mut self, offset: u64, expected: &[u8]) -> bool {
        let mut buf = [0u8; 8];
        let buf = &mut buf[..expected.len()];

        if self.file.seek(SeekFrom::Start(offset)).is_err() {
            return false;
        }
        if self.file.read_exact(buf).is_err() {
            return false;
        }

        buf == expected
    }
}
