use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use chrono_tz::Tz;
use rustc_hash::FxHashSet;

use crate::cache;
use crate::config::{Config, Strategy};
use crate::containment;
use crate::error::{CacheError, LoadError, LocationError};
use crate::index;
use crate::parser;
use crate::types::{Collection, Feature, Point, Ring};

static LOOKUP: OnceLock<Result<TzLookup, LoadError>> = OnceLock::new();

/// Resolves coordinates to timezones.
pub trait TimeZoneLookup {
    /// The tzid of the region containing the coordinate, or `""` when no
    /// region does.
    fn time_zone(&self, latitude: f64, longitude: f64) -> &str;

    /// The timezone containing the coordinate, resolved through the IANA
    /// database compiled into `chrono-tz`.
    fn location(&self, latitude: f64, longitude: f64) -> Result<Tz, LocationError>;
}

/// Timezone lookup over an immutable, indexed boundary collection.
///
/// The collection is built once in [`TzLookup::new`] and never modified
/// afterwards. Queries take `&self` and touch no shared mutable state, so a
/// `TzLookup` can be shared between threads without any locking.
#[derive(Debug)]
pub struct TzLookup {
    collection: Collection,
    strategy: Strategy,
}

impl TzLookup {
    /// The process-wide lookup, built on first use from [`Config::from_env`].
    ///
    /// Construction happens exactly once even when called from several
    /// threads at the same time; a load failure is remembered and returned
    /// to every caller.
    pub fn global() -> Result<&'static Self, &'static LoadError> {
        LOOKUP.get_or_init(|| Self::new(Config::from_env())).as_ref()
    }

    /// Loads the boundary data described by `config`.
    ///
    /// A usable cache is decoded directly. Otherwise the source archive is
    /// parsed and indexed, and the cache is rewritten. Cache problems are
    /// logged and never fail construction; source problems always do.
    pub fn new(config: Config) -> Result<Self, LoadError> {
        let started = Instant::now();
        let collection = load_collection(&config)?;
        tracing::info!(
            source = %config.source,
            features = collection.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Timezone boundaries loaded"
        );
        Ok(Self {
            collection,
            strategy: config.strategy,
        })
    }

    /// Wraps an already built collection, indexing it if needed.
    pub fn from_collection(mut collection: Collection) -> Self {
        if !index::is_indexed(&collection) {
            index::index(&mut collection);
        }
        Self {
            collection,
            strategy: Strategy::Exact,
        }
    }

    /// Replaces the containment strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The tzid at the coordinate, or `""` if no polygon contains it.
    ///
    /// Features are scanned in index order and the first one with a ring
    /// containing the point wins. Feature and ring bounding boxes are both
    /// inclusive, so a point exactly on a box edge is still tested.
    pub fn time_zone(&self, latitude: f64, longitude: f64) -> &str {
        self.find(Point::new(latitude, longitude))
            .map(|feature| feature.tzid.as_str())
            .unwrap_or("")
    }

    /// The timezone at the coordinate.
    ///
    /// Returns [`LocationError::NotFound`] when no polygon matches and
    /// [`LocationError::UnknownZone`] when the polygon's tzid is not in the
    /// timezone database.
    pub fn location(&self, latitude: f64, longitude: f64) -> Result<Tz, LocationError> {
        let tzid = self.time_zone(latitude, longitude);
        if tzid.is_empty() {
            return Err(LocationError::NotFound {
                lat: latitude,
                lon: longitude,
            });
        }
        tzid.parse::<Tz>()
            .map_err(|_| LocationError::UnknownZone(tzid.to_string()))
    }

    /// The feature whose geometry contains `point`, if any.
    pub fn find(&self, point: Point) -> Option<&Feature> {
        self.collection
            .features
            .iter()
            .find(|feature| self.feature_contains(feature, point))
    }

    fn feature_contains(&self, feature: &Feature, point: Point) -> bool {
        match feature.geometry.bbox() {
            Some(bbox) if bbox.contains(point) => {}
            _ => return false,
        }

        match self.strategy {
            Strategy::Exact => {
                candidates(feature, point).any(|ring| containment::contains(ring, point))
            }
            Strategy::CoarseFirst { stride } => {
                // Each ring gets exactly one exact test: sampled hits first,
                // then the sampled misses.
                let sampled = |ring: &&Ring| containment::contains_sampled(ring, point, stride);
                candidates(feature, point)
                    .filter(sampled)
                    .any(|ring| containment::contains(ring, point))
                    || candidates(feature, point)
                        .filter(|ring| !sampled(ring))
                        .any(|ring| containment::contains(ring, point))
            }
        }
    }

    /// The indexed collection.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Whether there are no features.
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Distinct tzids in index order.
    pub fn tzids(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.collection
            .features
            .iter()
            .map(|feature| feature.tzid.as_str())
            .filter(|tzid| seen.insert(*tzid))
            .collect()
    }
}

impl TimeZoneLookup for TzLookup {
    fn time_zone(&self, latitude: f64, longitude: f64) -> &str {
        TzLookup::time_zone(self, latitude, longitude)
    }

    fn location(&self, latitude: f64, longitude: f64) -> Result<Tz, LocationError> {
        TzLookup::location(self, latitude, longitude)
    }
}

/// Rings of `feature` whose bounding box contains `point`.
fn candidates(feature: &Feature, point: Point) -> impl Iterator<Item = &Ring> {
    feature
        .geometry
        .rings()
        .iter()
        .filter(move |ring| ring.bbox().is_some_and(|bbox| bbox.contains(point)))
}

fn load_collection(config: &Config) -> Result<Collection, LoadError> {
    let cache_path = config.cache.path();
    let fingerprint = match cache_path {
        Some(_) => Some(config.source.fingerprint()?),
        None => None,
    };

    if let (Some(path), Some(fingerprint)) = (&cache_path, fingerprint) {
        match cache::load(path, fingerprint) {
            Ok(collection) => {
                tracing::debug!(path = %path.display(), "Loaded boundaries from cache");
                return Ok(collection);
            }
            Err(err) => log_cache_miss(path, &err),
        }
    }

    let document = config.source.load_document()?;
    let collection = parser::parse_collection(&document)?;

    if let (Some(path), Some(fingerprint)) = (&cache_path, fingerprint) {
        if let Err(err) = cache::store(path, &collection, fingerprint) {
            tracing::warn!(path = %path.display(), error = %err, "Failed to write boundary cache");
        }
    }
    Ok(collection)
}

fn log_cache_miss(path: &Path, err: &CacheError) {
    match err {
        CacheError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No boundary cache yet");
        }
        CacheError::Stale { .. } => {
            tracing::info!(path = %path.display(), "Boundary cache is stale, reparsing source");
        }
        _ => {
            tracing::warn!(path = %path.display(), error = %err, "Ignoring unusable boundary cache");
        }
    }
}
