//! Offline timezone lookup from coordinates.
//!
//! `geotz` answers "which timezone is this latitude/longitude in?" from the
//! timezone boundary polygons published by
//! [timezone-boundary-builder](https://github.com/evansiroky/timezone-boundary-builder).
//! It works completely offline once the boundary archive is on disk (or
//! compiled in).
//!
//! # Features
//!
//! - **Simple API** - [`time_zone(lat, lon)`](time_zone) returns the tzid, or `""`
//! - **Exact** - Ray-casting point-in-polygon tests with a fixed rule for
//!   points that sit exactly on a vertex latitude
//! - **Fast Startup** - The parsed boundaries are cached in a compact
//!   bincode + zstd file, skipping the multi-megabyte GeoJSON parse on later runs
//! - **Thread-Safe** - The boundary data is immutable after loading; queries
//!   never lock
//! - **chrono Integration** - [`TzLookup::location`] resolves to a
//!   [`chrono_tz::Tz`]
//!
//! # Quick Start
//!
//! Download `timezones-with-oceans.geojson.zip` from the timezone-boundary-builder
//! releases (or run `cargo run --bin fetch-dataset --features fetch`), then:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tzid = geotz::time_zone(52.5200, 13.4050)?;
//! assert_eq!(tzid, "Europe/Berlin");
//! # Ok(())
//! # }
//! ```
//!
//! # Explicit Construction
//!
//! ```no_run
//! use geotz::{CachePolicy, Config, Source, TzLookup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(Source::file("data/timezones-with-oceans.geojson.zip"))
//!     .cache(CachePolicy::At("data/timezones.cache".into()));
//! let lookup = TzLookup::new(config)?;
//!
//! let tz = lookup.location(35.6762, 139.6503)?;
//! println!("{}", tz); // Asia/Tokyo
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ## Data Model
//!
//! - **Ring**: one closed polygon contour (outer ring only; holes are dropped)
//!   with a precomputed bounding box
//! - **Geometry**: all rings of a timezone plus an aggregate bounding box
//! - **Collection**: features sorted by minimum longitude
//!
//! ## Lookup Algorithm
//!
//! 1. Scan features in index order
//! 2. Skip features whose bounding box does not contain the point
//! 3. Skip rings whose bounding box does not contain the point
//! 4. Ray-cast against the remaining rings
//! 5. Return the tzid of the first feature with a containing ring
//!
//! Bounding boxes are inclusive at both levels, so pruning never rejects a
//! point that the ray cast would accept.
//!
//! ## Loading
//!
//! [`TzLookup::new`] tries the cache first. The cache records a fingerprint of
//! the source archive and is ignored when it does not match, is missing, or
//! fails to decode; the source is then parsed and the cache rewritten through a
//! temporary file and an atomic rename.
//!
//! # Configuration
//!
//! | Variable        | Meaning                                          |
//! |-----------------|--------------------------------------------------|
//! | `GEO_JSON_FILE` | Path of the boundary archive                     |
//! | `GEOTZ_CACHE`   | Path of the cache file, or `off` to disable it    |
//!
//! With the `embed-dataset` feature, `build.rs` embeds the archive named by
//! `GEOTZ_DATASET` at compile time and it becomes the default source.
//!
//! # Modules
//!
//! - [`types`] - Geometry model ([`Point`], [`Ring`], [`Geometry`], [`Collection`])
//! - [`parser`] - GeoJSON decoding
//! - [`index`] - Feature and ring ordering
//! - [`containment`] - Point-in-ring tests
//! - [`cache`] - Persisted cache codec
//! - [`source`] - Boundary archive loading
//! - [`config`] - Construction-time configuration

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod containment;
pub mod error;
pub mod index;
mod lookup;
pub mod parser;
pub mod source;
pub mod types;

pub use config::{CachePolicy, Config, Strategy};
pub use error::{CacheError, DecodeError, LoadError, LocationError};
pub use lookup::{TimeZoneLookup, TzLookup};
pub use source::Source;
pub use types::{BoundingBox, Collection, Feature, Geometry, Point, Ring};

/// Returns the tzid at the given coordinates, or `""` outside every polygon.
///
/// Uses the process-wide [`TzLookup::global`], which is built on first call
/// from the environment (see [`Config::from_env`]). An error is returned only
/// when that load failed.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Tokyo
/// assert_eq!(geotz::time_zone(35.6762, 139.6503)?, "Asia/Tokyo");
/// # Ok(())
/// # }
/// ```
pub fn time_zone(latitude: f64, longitude: f64) -> Result<&'static str, &'static LoadError> {
    Ok(TzLookup::global()?.time_zone(latitude, longitude))
}

/// Returns the timezone at the given coordinates.
///
/// The outer error reports a failed load of the process-wide
/// [`TzLookup::global`]; the inner one is the per-query [`LocationError`].
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tz = geotz::location(48.8566, 2.3522)??;
/// assert_eq!(tz, chrono_tz::Europe::Paris);
/// # Ok(())
/// # }
/// ```
pub fn location(
    latitude: f64,
    longitude: f64,
) -> Result<Result<chrono_tz::Tz, LocationError>, &'static LoadError> {
    Ok(TzLookup::global()?.location(latitude, longitude))
}
