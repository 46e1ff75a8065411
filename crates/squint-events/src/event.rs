use std::path::PathBuf;

/// Diagnostics emitted while classifying AppImage files.
///
/// Diagnostics are informational: they never change a classification result
/// and never carry an error. They exist so that embedders can surface
/// recoverable oddities in the files they inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// File has the structural shape of a Type 1 AppImage (ISO 9660 image
    /// with an ELF stub) but lacks the `AI\x01` magic bytes at offset 8.
    ///
    /// Emitted when detection falls back to the structural heuristic and
    /// classifies the file as Type 1 anyway. Older AppImage tooling produced
    /// such files.
    MissingMagicBytes { path: PathBuf },
}
