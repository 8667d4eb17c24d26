mod common;

use std::path::Path;

use geotz::cache;
use geotz::{CachePolicy, Config, LoadError, Source, TzLookup};

fn load(archive: &Path, cache_file: &Path) -> Result<TzLookup, LoadError> {
    TzLookup::new(Config::new(Source::file(archive)).cache(CachePolicy::At(cache_file.into())))
}

#[test]
fn first_load_writes_cache_and_second_reads_it() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));
    let cache_file = dir.path().join("cache").join("timezones.cache");

    let parsed = load(&archive, &cache_file).unwrap();
    assert!(cache_file.exists());

    let fingerprint = Source::file(&archive).fingerprint().unwrap();
    let cached = cache::load(&cache_file, fingerprint).unwrap();
    assert_eq!(&cached, parsed.collection());

    let reloaded = load(&archive, &cache_file).unwrap();
    assert_eq!(reloaded.collection(), parsed.collection());
    assert_eq!(reloaded.time_zone(52.52, 13.405), "Europe/Berlin");
    assert_eq!(reloaded.time_zone(5.0, 5.0), "TestZone");
}

#[test]
fn cache_is_used_while_fingerprint_matches() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));
    let cache_file = dir.path().join("timezones.cache");
    let fingerprint = Source::file(&archive).fingerprint().unwrap();

    // A cache that disagrees with the archive but carries its fingerprint
    // proves the archive was not reparsed.
    let planted = geotz::parser::parse_collection(
        common::feature_collection(&[common::polygon_feature(
            "Planted/Zone",
            &common::rect(0.0, 0.0, 10.0, 10.0),
        )])
        .as_bytes(),
    )
    .unwrap();
    cache::store(&cache_file, &planted, fingerprint).unwrap();

    let lookup = load(&archive, &cache_file).unwrap();
    assert_eq!(lookup.time_zone(5.0, 5.0), "Planted/Zone");
    assert_eq!(lookup.len(), 1);
}

#[test]
fn garbage_cache_falls_back_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));
    let cache_file = dir.path().join("timezones.cache");
    std::fs::write(&cache_file, b"definitely not a cache").unwrap();

    let lookup = load(&archive, &cache_file).unwrap();
    assert_eq!(lookup.time_zone(52.52, 13.405), "Europe/Berlin");

    // The unusable file is replaced with a valid one.
    let fingerprint = Source::file(&archive).fingerprint().unwrap();
    assert!(cache::load(&cache_file, fingerprint).is_ok());
}

#[test]
fn truncated_cache_falls_back_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));
    let cache_file = dir.path().join("timezones.cache");
    let reference = load(&archive, &cache_file).unwrap();

    let bytes = std::fs::read(&cache_file).unwrap();
    std::fs::write(&cache_file, &bytes[..bytes.len() / 2]).unwrap();

    let lookup = load(&archive, &cache_file).unwrap();
    assert_eq!(lookup.collection(), reference.collection());
}

#[test]
fn stale_cache_is_rebuilt_after_source_changes() {
    let dir = tempfile::tempdir().unwrap();
    let archive = common::write_archive(
        dir.path(),
        "zones.zip",
        &common::zip_document(&common::feature_collection(&[common::polygon_feature(
            "Old/Zone",
            &common::rect(0.0, 0.0, 10.0, 10.0),
        )])),
    );
    let cache_file = dir.path().join("timezones.cache");
    assert_eq!(load(&archive, &cache_file).unwrap().time_zone(5.0, 5.0), "Old/Zone");

    common::write_archive(
        dir.path(),
        "zones.zip",
        &common::zip_document(&common::feature_collection(&[
            common::polygon_feature("New/Zone", &common::rect(0.0, 0.0, 10.0, 10.0)),
            common::polygon_feature("Other/Zone", &common::rect(20.0, 20.0, 30.0, 30.0)),
        ])),
    );

    let lookup = load(&archive, &cache_file).unwrap();
    assert_eq!(lookup.time_zone(5.0, 5.0), "New/Zone");
    assert_eq!(lookup.time_zone(25.0, 25.0), "Other/Zone");

    let fingerprint = Source::file(&archive).fingerprint().unwrap();
    assert_eq!(cache::load(&cache_file, fingerprint).unwrap().len(), 2);
}

#[test]
fn unwritable_cache_location_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));
    // A regular file where the cache directory should be.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    let lookup = load(&archive, &blocker.join("timezones.cache")).unwrap();
    assert_eq!(lookup.time_zone(52.52, 13.405), "Europe/Berlin");
}

#[test]
fn disabled_cache_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let archive =
        common::write_archive(dir.path(), "world.zip", &common::zip_document(&common::world()));

    TzLookup::new(Config::new(Source::file(&archive)).cache(CachePolicy::Disabled)).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn same_size_archives_with_equal_mtime_do_not_share_cache() {
    let dir = tempfile::tempdir().unwrap();
    let zone = |tzid: &str| {
        common::zip_document(&common::feature_collection(&[common::polygon_feature(
            tzid,
            &common::rect(0.0, 0.0, 10.0, 10.0),
        )]))
    };
    let (old, new) = (zone("Old/Zone"), zone("New/Zone"));
    assert_eq!(old.len(), new.len());

    let a = common::write_archive(dir.path(), "a.zip", &old);
    let b = common::write_archive(dir.path(), "b.zip", &new);
    let modified = std::fs::metadata(&a).unwrap().modified().unwrap();
    let set_mtime = |path: &Path| {
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    };
    set_mtime(&b);
    let cache_file = dir.path().join("timezones.cache");

    assert_eq!(load(&a, &cache_file).unwrap().time_zone(5.0, 5.0), "Old/Zone");
    assert_eq!(load(&b, &cache_file).unwrap().time_zone(5.0, 5.0), "New/Zone");
    assert_eq!(load(&a, &cache_file).unwrap().time_zone(5.0, 5.0), "Old/Zone");

    // Replace a.zip in place, keeping its length and mtime.
    std::fs::write(&a, &new).unwrap();
    set_mtime(&a);
    let reloaded = load(&a, &cache_file).unwrap();
    let uncached =
        TzLookup::new(Config::new(Source::file(&a)).cache(CachePolicy::Disabled)).unwrap();
    assert_eq!(reloaded.collection(), uncached.collection());
    assert_eq!(reloaded.time_zone(5.0, 5.0), "New/Zone");
}
