//! Persisted cache of the parsed, indexed collection.
//!
//! Parsing the full boundary document takes seconds; decoding the cache takes
//! a fraction of that. The file layout is:
//!
//! ```text
//! MAGIC (8 bytes, uncompressed)
//! zstd frame {
//!     Header { version: u32, fingerprint: u64 }   bincode, standard config
//!     Collection                                  bincode, standard config
//! }
//! ```
//!
//! The header is decoded first, so a stale cache (built from a different
//! source) is rejected without decoding the collection. Every failure here is
//! recoverable: callers log it and parse the source instead.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::CacheError;
use crate::types::Collection;

/// Leading bytes of every cache file.
pub const MAGIC: [u8; 8] = *b"GEOTZ\x00\x01\x00";

/// Layout version; bump when [`Collection`] changes shape.
pub const FORMAT_VERSION: u32 = 1;

const COMPRESSION_LEVEL: i32 = 3;

/// Upper bound on any single decoded allocation, so a corrupt length prefix
/// cannot request absurd amounts of memory.
const DECODE_LIMIT: usize = 1 << 30;

#[derive(Debug, bincode::Encode, bincode::Decode)]
struct Header {
    version: u32,
    fingerprint: u64,
}

/// Serializes `collection` tagged with the `fingerprint` of its source.
pub fn encode(collection: &Collection, fingerprint: u64) -> Result<Vec<u8>, CacheError> {
    let config = bincode::config::standard();
    let header = Header {
        version: FORMAT_VERSION,
        fingerprint,
    };

    let mut encoder = zstd::stream::write::Encoder::new(MAGIC.to_vec(), COMPRESSION_LEVEL)?;
    encoder.include_checksum(true)?;
    bincode::encode_into_std_write(&header, &mut encoder, config)?;
    bincode::encode_into_std_write(collection, &mut encoder, config)?;
    Ok(encoder.finish()?)
}

/// Restores a collection written by [`encode`].
///
/// Fails if the bytes are not a cache, come from another format version,
/// were built from a source other than `fingerprint`, are truncated or
/// corrupt, or carry trailing data.
pub fn decode(bytes: &[u8], fingerprint: u64) -> Result<Collection, CacheError> {
    let payload = bytes.strip_prefix(&MAGIC[..]).ok_or(CacheError::BadMagic)?;
    let config = bincode::config::standard().with_limit::<DECODE_LIMIT>();
    let mut decoder = zstd::stream::read::Decoder::new(payload)?;

    let header: Header = bincode::decode_from_std_read(&mut decoder, config)?;
    if header.version != FORMAT_VERSION {
        return Err(CacheError::Version {
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }
    if header.fingerprint != fingerprint {
        return Err(CacheError::Stale {
            found: header.fingerprint,
            expected: fingerprint,
        });
    }

    let collection: Collection = bincode::decode_from_std_read(&mut decoder, config)?;

    let mut rest = Vec::new();
    decoder.read_to_end(&mut rest)?;
    if !rest.is_empty() {
        return Err(CacheError::TrailingBytes(rest.len()));
    }
    Ok(collection)
}

/// Reads and decodes the cache at `path`.
pub fn load(path: &Path, fingerprint: u64) -> Result<Collection, CacheError> {
    let bytes = fs::read(path)?;
    decode(&bytes, fingerprint)
}

/// Writes the cache to `path` atomically.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old file or the complete
/// new one.
pub fn store(path: &Path, collection: &Collection, fingerprint: u64) -> Result<(), CacheError> {
    let bytes = encode(collection, fingerprint)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote boundary cache");
    Ok(())
}
