//! SquashFS payload listing for Type 2 AppImages.

use std::path::{Path, PathBuf};

use squishy::appimage::AppImage;

use crate::error::Result;

/// Collects the entry paths of the SquashFS payload appended to `path`.
///
/// `squishy` locates the payload superblock itself, so no offset needs to
/// be supplied here.
pub(crate) fn entry_paths(path: &Path) -> Result<Vec<PathBuf>> {
    let appimage = AppImage::new(None, &path, None)?;

    let paths = appimage
        .entries()
        .map(|entry| entry.path)
        .collect();

    Ok(paths)
}
