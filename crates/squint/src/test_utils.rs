//! Shared fixture builders for tests: synthetic ELF headers and ISO 9660
//! images assembled in memory.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::formats::{ELF_MAGIC_BYTES, TYPE1_MAGIC_BYTES, TYPE2_MAGIC_BYTES};

pub(crate) const SECTOR_SIZE: usize = 2048;

/// Writes `bytes` to a fresh temporary file.
pub(crate) fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// A 64-bit little-endian ELF header with the given section header table
/// geometry. Nothing beyond the header is needed for size computation.
pub(crate) fn elf64_header(shoff: u64, shentsize: u16, shnum: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    bytes[..4].copy_from_slice(&ELF_MAGIC_BYTES);
    bytes[4] = 2; // ELFCLASS64
    bytes[5] = 1; // ELFDATA2LSB
    bytes[6] = 1;
    bytes[0x28..0x30].copy_from_slice(&shoff.to_le_bytes());
    bytes[0x3a..0x3c].copy_from_slice(&shentsize.to_le_bytes());
    bytes[0x3c..0x3e].copy_from_slice(&shnum.to_le_bytes());
    bytes
}

/// A 32-bit big-endian ELF header, for the other class/byte-order corner.
pub(crate) fn elf32_header_be(shoff: u32, shentsize: u16, shnum: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; 52];
    bytes[..4].copy_from_slice(&ELF_MAGIC_BYTES);
    bytes[4] = 1; // ELFCLASS32
    bytes[5] = 2; // ELFDATA2MSB
    bytes[6] = 1;
    bytes[32..36].copy_from_slice(&shoff.to_be_bytes());
    bytes[46..48].copy_from_slice(&shentsize.to_be_bytes());
    bytes[48..50].copy_from_slice(&shnum.to_be_bytes());
    bytes
}

/// Stamps the Type 1 magic bytes at offset 8.
pub(crate) fn with_type1_magic(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes[8..11].copy_from_slice(&TYPE1_MAGIC_BYTES);
    bytes
}

/// Stamps the Type 2 magic bytes at offset 8.
pub(crate) fn with_type2_magic(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes[8..11].copy_from_slice(&TYPE2_MAGIC_BYTES);
    bytes
}

/// An ISO 9660 directory record. `extent_sector` is the logical block
/// number of the entry's data; directory flag is 0x02.
pub(crate) fn dir_record(id: &[u8], extent_sector: u32, data_length: u32, flags: u8) -> Vec<u8> {
    dir_record_with_system_use(id, extent_sector, data_length, flags, &[])
}

/// Like [`dir_record`], with a raw system use area appended (for Rock
/// Ridge entries).
pub(crate) fn dir_record_with_system_use(
    id: &[u8],
    extent_sector: u32,
    data_length: u32,
    flags: u8,
    system_use: &[u8],
) -> Vec<u8> {
    let pad = usize::from(id.len() % 2 == 0);
    let len = 33 + id.len() + pad + system_use.len();

    let mut record = vec![0u8; len];
    record[0] = len as u8;
    record[2..6].copy_from_slice(&extent_sector.to_le_bytes());
    record[6..10].copy_from_slice(&extent_sector.to_be_bytes());
    record[10..14].copy_from_slice(&data_length.to_le_bytes());
    record[14..18].copy_from_slice(&data_length.to_be_bytes());
    record[25] = flags;
    record[32] = id.len() as u8;
    record[33..33 + id.len()].copy_from_slice(id);

    let su_start = 33 + id.len() + pad;
    record[su_start..].copy_from_slice(system_use);
    record
}

/// Packs directory records into a single zero-padded sector.
pub(crate) fn dir_sector(records: &[Vec<u8>]) -> Vec<u8> {
    let mut sector = vec![0u8; SECTOR_SIZE];
    let mut pos = 0;
    for record in records {
        sector[pos..pos + record.len()].copy_from_slice(record);
        pos += record.len();
    }
    sector
}

/// Assembles an ISO 9660 image: 32 KiB system area, primary volume
/// descriptor at sector 16 with the root directory at sector 18 spanning
/// `root_length` bytes, terminator at sector 17, and `dirs` as directory
/// extents occupying sectors 18, 19, ...
pub(crate) fn build_iso_image(root_length: u32, dirs: &[Vec<u8>]) -> Vec<u8> {
    let mut image = vec![0u8; (18 + dirs.len()) * SECTOR_SIZE];

    let pvd = &mut image[16 * SECTOR_SIZE..17 * SECTOR_SIZE];
    pvd[0] = 1;
    pvd[1..6].copy_from_slice(b"CD001");
    pvd[6] = 1;
    pvd[128..130].copy_from_slice(&2048u16.to_le_bytes());
    pvd[130..132].copy_from_slice(&2048u16.to_be_bytes());
    let root = dir_record(&[0x00], 18, root_length, 0x02);
    pvd[156..156 + root.len()].copy_from_slice(&root);

    let terminator = &mut image[17 * SECTOR_SIZE..18 * SECTOR_SIZE];
    terminator[0] = 255;
    terminator[1..6].copy_from_slice(b"CD001");
    terminator[6] = 1;

    for (index, dir) in dirs.iter().enumerate() {
        let start = (18 + index) * SECTOR_SIZE;
        image[start..start + dir.len()].copy_from_slice(dir);
    }

    image
}

/// A small image with one subdirectory and two files:
/// `APPS/`, `APPS/RUN`, `README.TXT`.
pub(crate) fn iso_image() -> Vec<u8> {
    let root = dir_sector(&[
        dir_record(&[0x00], 18, 2048, 0x02),
        dir_record(&[0x01], 18, 2048, 0x02),
        dir_record(b"APPS", 19, 2048, 0x02),
        dir_record(b"README.TXT;1", 20, 13, 0),
    ]);
    let apps = dir_sector(&[
        dir_record(&[0x00], 19, 2048, 0x02),
        dir_record(&[0x01], 18, 2048, 0x02),
        dir_record(b"RUN;1", 20, 5, 0),
    ]);

    build_iso_image(2048, &[root, apps])
}
