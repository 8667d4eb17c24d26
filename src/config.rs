//! Construction-time configuration.
//!
//! The source archive is chosen in this order: an explicit path, the
//! `GEO_JSON_FILE` environment variable, the bundled archive (with the
//! `embed-dataset` feature), and finally `timezones-with-oceans.geojson.zip` in
//! the working directory.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::source::Source;

/// Default archive name, as published by timezone-boundary-builder.
pub const DEFAULT_SOURCE_FILE: &str = "timezones-with-oceans.geojson.zip";

/// Environment variable overriding the source archive path.
pub const SOURCE_ENV: &str = "GEO_JSON_FILE";

/// Environment variable overriding the cache path. `off` disables the cache.
pub const CACHE_ENV: &str = "GEOTZ_CACHE";

/// File name of the persisted cache inside the cache directory.
pub const CACHE_FILE_NAME: &str = "timezones.cache";

/// Whether and where the parsed collection is cached between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Always parse the source; never read or write a cache.
    Disabled,
    /// Use [`default_cache_path`].
    #[default]
    Default,
    /// Use the given file.
    At(PathBuf),
}

impl CachePolicy {
    /// Reads [`CACHE_ENV`], falling back to [`CachePolicy::Default`].
    pub fn from_env() -> Self {
        match std::env::var_os(CACHE_ENV) {
            Some(value) => Self::parse(&value.to_string_lossy()),
            None => CachePolicy::Default,
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim() {
            "" => CachePolicy::Default,
            v if v.eq_ignore_ascii_case("off")
                || v.eq_ignore_ascii_case("false")
                || v == "0" =>
            {
                CachePolicy::Disabled
            }
            v => CachePolicy::At(PathBuf::from(v)),
        }
    }

    /// The cache file to use, `None` when caching is disabled.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            CachePolicy::Disabled => None,
            CachePolicy::Default => Some(default_cache_path()),
            CachePolicy::At(path) => Some(path.clone()),
        }
    }
}

impl FromStr for CachePolicy {
    type Err = Infallible;

    /// `off`, `false` and `0` disable the cache, an empty value selects the
    /// default location and anything else is a cache file path.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(value))
    }
}

/// How ring containment is evaluated during a lookup.
///
/// Both strategies return identical results; they only differ in cost.
/// `CoarseFirst` is a ring-ordering heuristic: it pays for a sampled winding
/// test on every candidate ring so that, in features with many rings, the
/// ring holding the point tends to be tested exactly first. It does not save
/// work when no ring contains the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Test every candidate ring with the exact ray-casting test.
    #[default]
    Exact,
    /// Exactly test rings that a winding-number test over every `stride`-th
    /// vertex reports as inside, then the remaining candidates. No ring is
    /// tested exactly twice.
    CoarseFirst {
        /// Vertex sampling stride for the coarse pass
        stride: usize,
    },
}

/// Everything needed to build a [`TzLookup`](crate::TzLookup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the boundary archive is read from
    pub source: Source,
    /// Persisted cache behavior
    pub cache: CachePolicy,
    /// Containment strategy for lookups
    pub strategy: Strategy,
}

impl Config {
    /// Configuration for `source` with the default cache and exact lookups.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            cache: CachePolicy::Default,
            strategy: Strategy::Exact,
        }
    }

    /// Configuration from the environment.
    ///
    /// Reads [`SOURCE_ENV`] and [`CACHE_ENV`]. Without a source override the
    /// bundled archive is used when compiled in, else [`DEFAULT_SOURCE_FILE`].
    pub fn from_env() -> Self {
        let source = match source_from_env() {
            Some(path) => Source::File(path),
            None => default_source(),
        };
        Self {
            cache: CachePolicy::from_env(),
            ..Self::new(source)
        }
    }

    /// Uses `path` as the source if given, otherwise behaves like
    /// [`Config::from_env`].
    pub fn with_source_path(path: Option<&Path>) -> Self {
        let mut config = Self::from_env();
        if let Some(path) = path {
            config.source = Source::file(path);
        }
        config
    }

    /// Replaces the cache policy.
    pub fn cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the containment strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn source_from_env() -> Option<PathBuf> {
    std::env::var_os(SOURCE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(feature = "embed-dataset")]
fn default_source() -> Source {
    Source::bundled()
}

#[cfg(not(feature = "embed-dataset"))]
fn default_source() -> Source {
    Source::file(DEFAULT_SOURCE_FILE)
}

/// The platform cache directory's `timezones.cache`.
///
/// Falls back to the system temp directory when no home directory is known.
pub fn default_cache_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "geotz")
        .map(|dirs| dirs.cache_dir().join(CACHE_FILE_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("geotz").join(CACHE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_policy_parsing() {
        assert_eq!(CachePolicy::parse("off"), CachePolicy::Disabled);
        assert_eq!(CachePolicy::parse("OFF"), CachePolicy::Disabled);
        assert_eq!(CachePolicy::parse("0"), CachePolicy::Disabled);
        assert_eq!(CachePolicy::parse(""), CachePolicy::Default);
        assert_eq!(
            CachePolicy::parse("/var/cache/tz.bin"),
            CachePolicy::At(PathBuf::from("/var/cache/tz.bin"))
        );
    }

    #[test]
    fn cache_policy_from_str() {
        assert_eq!("false".parse::<CachePolicy>(), Ok(CachePolicy::Disabled));
        assert_eq!(
            " tz.cache ".parse::<CachePolicy>(),
            Ok(CachePolicy::At(PathBuf::from("tz.cache")))
        );
    }

    #[test]
    fn disabled_cache_has_no_path() {
        assert!(CachePolicy::Disabled.path().is_none());
        assert_eq!(
            CachePolicy::At(PathBuf::from("x.cache")).path(),
            Some(PathBuf::from("x.cache"))
        );
        assert!(CachePolicy::Default
            .path()
            .is_some_and(|p| p.ends_with(CACHE_FILE_NAME)));
    }

    #[test]
    fn explicit_source_path_wins() {
        let config = Config::with_source_path(Some(Path::new("custom.zip")));
        assert_eq!(config.source, Source::file("custom.zip"));
    }

    #[test]
    fn builder_methods_replace_fields() {
        let config = Config::new(Source::file("a.zip"))
            .cache(CachePolicy::Disabled)
            .strategy(Strategy::CoarseFirst { stride: 8 });
        assert_eq!(config.cache, CachePolicy::Disabled);
        assert_eq!(config.strategy, Strategy::CoarseFirst { stride: 8 });
    }
}
