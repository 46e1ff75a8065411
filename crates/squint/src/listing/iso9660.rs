//! ISO 9660 directory traversal for Type 1 payloads.
//!
//! Type 1 AppImages are ISO 9660 images with the ELF runtime tucked into
//! the 32 KiB system area, so the filesystem structures sit where a plain
//! ISO has them. Only the primary volume descriptor is consulted. Rock
//! Ridge `NM` entries override the plain ISO identifiers when present.

use std::{
    collections::{HashSet, VecDeque},
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    error::{ErrorContext, PackageError, Result},
    formats::ISO9660_MAGIC_BYTES,
};

/// Sector size of the volume descriptor area.
const DESCRIPTOR_SECTOR_SIZE: u64 = 2048;

/// First sector of the volume descriptor set.
const DESCRIPTOR_START_SECTOR: u64 = 16;

/// Descriptor sets end with a terminator; stop scanning after this many
/// sectors even without one.
const DESCRIPTOR_SCAN_LIMIT: u64 = 16;

const PRIMARY_VOLUME_DESCRIPTOR: u8 = 1;
const VOLUME_DESCRIPTOR_TERMINATOR: u8 = 255;

/// Directory record flag bit marking a directory.
const FLAG_DIRECTORY: u8 = 0x02;

/// Directory extents larger than this are rejected as malformed.
const MAX_DIRECTORY_EXTENT: u64 = 4 * 1024 * 1024;

/// Breadth-first walk over the directory tree of an ISO 9660 image.
#[derive(Debug)]
pub(crate) struct Iso9660Walker {
    file: File,
    path: PathBuf,
    block_size: u64,
    /// Directory extents still to be read: (path, byte offset, byte length).
    pending: VecDeque<(PathBuf, u64, u64)>,
    /// Entries parsed but not yet yielded.
    ready: VecDeque<PathBuf>,
    /// Extent offsets already queued; malformed images can form cycles.
    seen: HashSet<u64>,
}

impl Iso9660Walker {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

        let pvd = find_primary_volume_descriptor(&mut file, path)?;

        let block_size = u64::from(LittleEndian::read_u16(&pvd[128..130]));
        if block_size == 0 {
            return Err(invalid_iso(path, "zero logical block size"));
        }

        // root directory record at offset 156 of the descriptor
        let root = &pvd[156..190];
        let extent = u64::from(LittleEndian::read_u32(&root[2..6])) * block_size;
        let length = u64::from(LittleEndian::read_u32(&root[10..14]));

        let mut walker = Iso9660Walker {
            file,
            path: path.to_path_buf(),
            block_size,
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            seen: HashSet::new(),
        };
        walker.seen.insert(extent);
        walker.pending.push_back((PathBuf::new(), extent, length));

        Ok(walker)
    }

    /// Parses one directory extent, queueing entries and subdirectories.
    fn read_directory(&mut self, dir: &Path, offset: u64, length: u64) -> Result<()> {
        if length > MAX_DIRECTORY_EXTENT {
            return Err(invalid_iso(&self.path, "oversized directory extent"));
        }

        let mut data = vec![0u8; length as usize];
        self.file
            .seek(SeekFrom::Start(offset))
            .with_context(|| format!("seeking in {}", self.path.display()))?;
        self.file
            .read_exact(&mut data)
            .map_err(|_| invalid_iso(&self.path, "directory extent past end of image"))?;

        let block_size = self.block_size as usize;
        let mut pos = 0;
        while pos < data.len() {
            let record_len = data[pos] as usize;
            if record_len == 0 {
                // records never cross sector boundaries; a zero length byte
                // means the rest of the sector is padding
                pos = (pos / block_size + 1) * block_size;
                continue;
            }
            if pos + record_len > data.len() {
                return Err(invalid_iso(&self.path, "directory record past end of extent"));
            }
            let record = &data[pos..pos + record_len];
            pos += record_len;

            if record.len() < 34 {
                return Err(invalid_iso(&self.path, "directory record too short"));
            }
            let id_len = record[32] as usize;
            if 33 + id_len > record.len() {
                return Err(invalid_iso(&self.path, "identifier past end of record"));
            }
            let id = &record[33..33 + id_len];
            if matches!(id, [0x00] | [0x01]) {
                continue;
            }

            let Some(name) = entry_name(record, id) else {
                continue;
            };
            let entry_path = dir.join(name);

            if record[25] & FLAG_DIRECTORY != 0 {
                let extent = u64::from(LittleEndian::read_u32(&record[2..6])) * self.block_size;
                let length = u64::from(LittleEndian::read_u32(&record[10..14]));
                if self.seen.insert(extent) {
                    self.pending.push_back((entry_path.clone(), extent, length));
                }
            }

            self.ready.push_back(entry_path);
        }

        Ok(())
    }
}

impl Iterator for Iso9660Walker {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Some(Ok(path));
            }

            let (dir, offset, length) = self.pending.pop_front()?;
            if let Err(err) = self.read_directory(&dir, offset, length) {
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}

fn find_primary_volume_descriptor(file: &mut File, path: &Path) -> Result<Vec<u8>> {
    for index in 0..DESCRIPTOR_SCAN_LIMIT {
        let offset = (DESCRIPTOR_START_SECTOR + index) * DESCRIPTOR_SECTOR_SIZE;
        let mut sector = vec![0u8; DESCRIPTOR_SECTOR_SIZE as usize];

        file.seek(SeekFrom::Start(offset))
            .with_context(|| format!("seeking in {}", path.display()))?;
        file.read_exact(&mut sector)
            .map_err(|_| invalid_iso(path, "truncated volume descriptor area"))?;

        if sector[1..6] != ISO9660_MAGIC_BYTES {
            continue;
        }
        match sector[0] {
            PRIMARY_VOLUME_DESCRIPTOR => return Ok(sector),
            VOLUME_DESCRIPTOR_TERMINATOR => break,
            _ => {}
        }
    }

    Err(invalid_iso(path, "no primary volume descriptor"))
}

fn invalid_iso(path: &Path, reason: &str) -> PackageError {
    PackageError::InvalidIso9660 {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Resolves the display name of a directory record, preferring Rock Ridge
/// `NM` entries over the plain ISO 9660 identifier.
fn entry_name(record: &[u8], id: &[u8]) -> Option<String> {
    if let Some(name) = rock_ridge_name(record) {
        return Some(name);
    }

    let raw = String::from_utf8_lossy(id);
    let base = raw.split(';').next().unwrap_or("").trim_end_matches('.');
    (!base.is_empty()).then(|| base.to_string())
}

/// Scans the system use area for `NM` (alternate name) entries. Name parts
/// flagged CONTINUE are concatenated.
fn rock_ridge_name(record: &[u8]) -> Option<String> {
    let id_len = record[32] as usize;
    let mut pos = 33 + id_len;
    if id_len % 2 == 0 {
        pos += 1; // pad byte keeps the system use area word-aligned
    }

    let mut name = String::new();
    let mut found = false;
    while pos + 4 <= record.len() {
        let entry_len = record[pos + 2] as usize;
        if entry_len < 4 || pos + entry_len > record.len() {
            break;
        }
        if &record[pos..pos + 2] == b"NM" && entry_len >= 5 {
            found = true;
            name.push_str(&String::from_utf8_lossy(&record[pos + 5..pos + entry_len]));
            if record[pos + 4] & 0x01 == 0 {
                break; // no CONTINUE flag: name is complete
            }
        }
        pos += entry_len;
    }

    (found && !name.is_empty()).then_some(name)
}
