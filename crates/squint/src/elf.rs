//! Size computation for the leading ELF runtime of an AppImage.
//!
//! An AppImage is laid out as `[ELF runtime][payload]`: the payload begins
//! exactly where the ELF ends, and the ELF's total size is the end of its
//! section header table, `e_shoff + e_shentsize * e_shnum`.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use crate::{
    error::{ErrorContext, PackageError, Result},
    formats::ELF_MAGIC_BYTES,
};

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;
const ELFDATA2MSB: u8 = 2;

/// The section header table geometry of an ELF header, enough to compute
/// where the executable ends.
#[derive(Debug, Clone, Copy)]
struct ElfHeader {
    e_shoff: u64,
    e_shentsize: u16,
    e_shnum: u16,
}

impl ElfHeader {
    /// Reads the fields following `e_ident` in declaration order.
    fn from_reader<E, R>(reader: &mut R, is_64: bool) -> std::io::Result<Self>
    where
        E: ByteOrder,
        R: Read,
    {
        reader.read_u16::<E>()?; // e_type
        reader.read_u16::<E>()?; // e_machine
        reader.read_u32::<E>()?; // e_version

        let e_shoff = if is_64 {
            reader.read_u64::<E>()?; // e_entry
            reader.read_u64::<E>()?; // e_phoff
            reader.read_u64::<E>()?
        } else {
            reader.read_u32::<E>()?; // e_entry
            reader.read_u32::<E>()?; // e_phoff
            u64::from(reader.read_u32::<E>()?)
        };

        reader.read_u32::<E>()?; // e_flags
        reader.read_u16::<E>()?; // e_ehsize
        reader.read_u16::<E>()?; // e_phentsize
        reader.read_u16::<E>()?; // e_phnum
        let e_shentsize = reader.read_u16::<E>()?;
        let e_shnum = reader.read_u16::<E>()?;

        Ok(ElfHeader {
            e_shoff,
            e_shentsize,
            e_shnum,
        })
    }
}

/// Returns the total byte size of the ELF runtime at the start of `path`.
///
/// For an AppImage this is the byte offset at which the payload begins.
/// Both ELF classes and both byte orders are accepted; the file is re-read
/// on every call.
///
/// # Errors
///
/// Returns [`PackageError::IoError`] if the file cannot be opened, and
/// [`PackageError::InvalidElf`] if the leading bytes are not a valid ELF
/// header with a section header table.
pub fn stub_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut e_ident = [0u8; 16];
    reader
        .read_exact(&mut e_ident)
        .map_err(|_| invalid_elf(path, "truncated ELF identification"))?;

    if e_ident[..4] != ELF_MAGIC_BYTES {
        return Err(invalid_elf(path, "missing ELF magic bytes"));
    }

    let header = match (e_ident[EI_CLASS], e_ident[EI_DATA]) {
        (ELFCLASS32, ELFDATA2LSB) => ElfHeader::from_reader::<LittleEndian, _>(&mut reader, false),
        (ELFCLASS32, ELFDATA2MSB) => ElfHeader::from_reader::<BigEndian, _>(&mut reader, false),
        (ELFCLASS64, ELFDATA2LSB) => ElfHeader::from_reader::<LittleEndian, _>(&mut reader, true),
        (ELFCLASS64, ELFDATA2MSB) => ElfHeader::from_reader::<BigEndian, _>(&mut reader, true),
        _ => return Err(invalid_elf(path, "unsupported ELF class or data encoding")),
    }
    .map_err(|_| invalid_elf(path, "truncated ELF header"))?;

    if header.e_shoff == 0 || header.e_shnum == 0 {
        return Err(invalid_elf(path, "missing section header table"));
    }

    header
        .e_shoff
        .checked_add(u64::from(header.e_shentsize) * u64::from(header.e_shnum))
        .ok_or_else(|| invalid_elf(path, "section header table out of range"))
}

fn invalid_elf(path: &Path, reason: &str) -> PackageError {
    PackageError::InvalidElf {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
