//! Error types for loading boundary data and answering queries.

use std::path::PathBuf;

/// Raised when boundary data cannot be decoded.
///
/// Any decode error aborts the whole load; there is no partially decoded
/// collection.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The document is not valid JSON, does not have the expected shape, or
    /// holds a position with fewer than two numbers.
    #[error("invalid boundary document: {0}")]
    Json(#[from] serde_json::Error),
    /// A feature carried no timezone identifier in its properties.
    #[error("feature {feature}: missing \"tzid\" property")]
    MissingTzid {
        /// Index of the offending feature in the source document
        feature: usize,
    },
}

/// Fatal errors while constructing a lookup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source archive could not be read.
    #[error("failed to read boundary archive {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The archive is not a readable zip file.
    #[error("failed to unzip boundary archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// The archive contains no entries.
    #[error("boundary archive is empty")]
    EmptyArchive,
    /// The archive entry could not be extracted.
    #[error("failed to extract boundary document: {0}")]
    Extract(#[source] std::io::Error),
    /// The boundary document could not be decoded.
    #[error("failed to decode boundary document: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors from the persisted cache.
///
/// These never escape [`TzLookup::new`](crate::TzLookup::new); a failing cache
/// makes construction fall back to parsing the source.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing the collection failed.
    #[error("failed to encode cache: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// The cache contents are not a valid encoded collection.
    #[error("failed to decode cache: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// The file does not start with the cache magic.
    #[error("not a geotz cache file")]
    BadMagic,
    /// The file was written by an incompatible format version.
    #[error("unsupported cache version {found}, expected {expected}")]
    Version {
        /// Version stored in the file
        found: u32,
        /// Version this build reads
        expected: u32,
    },
    /// The cache was built from a different source.
    #[error("cache is stale: built from source {found:#018x}, current source is {expected:#018x}")]
    Stale {
        /// Fingerprint stored in the file
        found: u64,
        /// Fingerprint of the current source
        expected: u64,
    },
    /// The payload decoded but bytes were left over.
    #[error("cache has {0} trailing bytes")]
    TrailingBytes(usize),
    /// The finished temporary file could not be moved into place.
    #[error("failed to publish cache file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors returned by [`TimeZoneLookup::location`](crate::TimeZoneLookup::location).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// No timezone polygon contains the coordinate.
    #[error("no timezone found at ({lat}, {lon})")]
    NotFound {
        /// Queried latitude
        lat: f64,
        /// Queried longitude
        lon: f64,
    },
    /// The polygon's tzid is unknown to the timezone database.
    #[error("unknown timezone \"{0}\"")]
    UnknownZone(String),
}
