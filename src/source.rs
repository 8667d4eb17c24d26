//! Where the boundary archive comes from.
//!
//! A [`Source`] is either a zip archive on disk or archive bytes compiled into
//! the binary. Both go through the same extraction path: the archive must hold
//! at least one entry, and the first entry is the GeoJSON document.

use std::borrow::Cow;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use rustc_hash::FxHasher;

use crate::error::LoadError;

/// Upper bound on the buffer reserved before extracting the document.
const MAX_PREALLOCATION: u64 = 1 << 28;

/// File name of the archive embedded by the `embed-dataset` feature.
pub const EMBEDDED_FILE: &str = "timezones.geojson.zip";

#[cfg(all(feature = "embed-dataset", not(any(doc, clippy))))]
static BUNDLED: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/timezones.geojson.zip"));

#[cfg(all(feature = "embed-dataset", any(doc, clippy)))]
static BUNDLED: &[u8] = &[];

/// Loader for the boundary archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A zip archive on the filesystem.
    File(PathBuf),
    /// Zip archive bytes that live for the whole program.
    Embedded(&'static [u8]),
}

impl Source {
    /// A source reading the archive at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File(path.into())
    }

    /// A source over archive bytes, typically from `include_bytes!`.
    pub fn embedded(bytes: &'static [u8]) -> Self {
        Source::Embedded(bytes)
    }

    /// The archive compiled in by the `embed-dataset` feature.
    #[cfg(feature = "embed-dataset")]
    pub fn bundled() -> Self {
        Source::Embedded(BUNDLED)
    }

    /// The path of a file source.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::File(path) => Some(path),
            Source::Embedded(_) => None,
        }
    }

    /// Identifies the exact archive a cache was built from.
    ///
    /// Files are identified by their canonical path, size and modification
    /// time, plus the name, CRC-32 and size of every entry in the zip central
    /// directory. Only the central directory is read, nothing is
    /// decompressed. Embedded archives are hashed in full.
    pub fn fingerprint(&self) -> Result<u64, LoadError> {
        let mut hasher = FxHasher::default();
        match self {
            Source::File(path) => {
                let metadata = std::fs::metadata(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                hasher.write_u8(0);
                std::fs::canonicalize(path)
                    .unwrap_or_else(|_| path.clone())
                    .hash(&mut hasher);
                hasher.write_u64(metadata.len());
                if let Ok(modified) = metadata.modified() {
                    let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
                    hasher.write_u64(since_epoch.as_secs());
                    hasher.write_u32(since_epoch.subsec_nanos());
                }

                let file = File::open(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                hash_entries(&mut zip::ZipArchive::new(BufReader::new(file))?, &mut hasher)?;
            }
            Source::Embedded(bytes) => {
                hasher.write_u8(1);
                hasher.write_usize(bytes.len());
                hasher.write(bytes);
            }
        }
        Ok(hasher.finish())
    }

    /// Reads the raw archive bytes.
    pub fn read(&self) -> Result<Cow<'static, [u8]>, LoadError> {
        match self {
            Source::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                }),
            Source::Embedded(bytes) => Ok(Cow::Borrowed(*bytes)),
        }
    }

    /// Reads the archive and extracts the GeoJSON document.
    pub fn load_document(&self) -> Result<Vec<u8>, LoadError> {
        let archive = self.read()?;
        extract_document(&archive)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Embedded(bytes) => write!(f, "<embedded archive, {} bytes>", bytes.len()),
        }
    }
}

/// Hashes the central directory record of every entry.
fn hash_entries<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    hasher: &mut FxHasher,
) -> Result<(), LoadError> {
    hasher.write_usize(archive.len());
    for idx in 0..archive.len() {
        let entry = archive.by_index_raw(idx)?;
        hasher.write(entry.name().as_bytes());
        hasher.write_u32(entry.crc32());
        hasher.write_u64(entry.size());
    }
    Ok(())
}

/// The declared entry size is untrusted; a corrupt header must not be able
/// to request a huge allocation up front.
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}

/// Extracts the first entry of a zip archive.
///
/// An archive without entries is an error. Extra entries are ignored.
pub fn extract_document(archive: &[u8]) -> Result<Vec<u8>, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;
    if archive.is_empty() {
        return Err(LoadError::EmptyArchive);
    }
    if archive.len() > 1 {
        tracing::warn!(
            entries = archive.len(),
            "Boundary archive has more than one entry, using the first"
        );
    }

    let mut entry = archive.by_index(0)?;
    tracing::debug!(entry = entry.name(), size = entry.size(), "Extracting boundary document");
    let mut document = Vec::with_capacity(initial_capacity(entry.size()));
    entry
        .read_to_end(&mut document)
        .map_err(LoadError::Extract)?;
    Ok(document)
}
