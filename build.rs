//! Build script for embedding the timezone boundary archive.
//!
//! With the `embed-dataset` feature enabled, this script copies the archive
//! named by `GEOTZ_DATASET` (default: `timezones-with-oceans.geojson.zip` in the
//! crate root) into `OUT_DIR`, where `src/source.rs` picks it up with
//! `include_bytes!`.
//!
//! # Skip Conditions
//!
//! Nothing is copied when:
//! - the `embed-dataset` feature is disabled
//! - building on docs.rs (`DOCS_RS` env var set)
//! - running clippy (`CLIPPY_ARGS` env var set)

use std::path::PathBuf;

const DEFAULT_DATASET: &str = "timezones-with-oceans.geojson.zip";
const EMBEDDED_FILE: &str = "timezones.geojson.zip";

fn main() {
    println!("cargo:rerun-if-env-changed=GEOTZ_DATASET");

    if std::env::var_os("CARGO_FEATURE_EMBED_DATASET").is_none() {
        return;
    }

    if std::env::var("DOCS_RS").is_ok() || std::env::var("CLIPPY_ARGS").is_ok() {
        return;
    }

    let dataset = std::env::var_os("GEOTZ_DATASET")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATASET));
    println!("cargo:rerun-if-changed={}", dataset.display());

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    std::fs::copy(&dataset, out_dir.join(EMBEDDED_FILE)).unwrap_or_else(|err| {
        panic!(
            "Failed to embed boundary archive {}: {} (set GEOTZ_DATASET or run the fetch-dataset binary)",
            dataset.display(),
            err
        )
    });
}
