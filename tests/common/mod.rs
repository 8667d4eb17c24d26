#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// A GeoJSON feature with a single-part polygon given as `(lat, lon)` pairs.
pub fn polygon_feature(tzid: &str, ring: &[(f64, f64)]) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"tzid":"{}"}},"geometry":{{"type":"Polygon","coordinates":[{}]}}}}"#,
        tzid,
        positions(ring)
    )
}

/// A GeoJSON feature with one polygon part per ring.
pub fn multipolygon_feature(tzid: &str, rings: &[&[(f64, f64)]]) -> String {
    let parts: Vec<String> = rings
        .iter()
        .map(|ring| format!("[{}]", positions(ring)))
        .collect();
    format!(
        r#"{{"type":"Feature","properties":{{"tzid":"{}"}},"geometry":{{"type":"MultiPolygon","coordinates":[{}]}}}}"#,
        tzid,
        parts.join(",")
    )
}

fn positions(ring: &[(f64, f64)]) -> String {
    let coords: Vec<String> = ring
        .iter()
        .map(|(lat, lon)| format!("[{:?},{:?}]", lon, lat))
        .collect();
    format!("[{}]", coords.join(","))
}

pub fn feature_collection(features: &[String]) -> String {
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

/// Zips `document` as the archive's only entry.
pub fn zip_document(document: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("combined.json", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// An archive with no entries at all.
pub fn empty_zip() -> Vec<u8> {
    zip::ZipWriter::new(Cursor::new(Vec::new()))
        .finish()
        .unwrap()
        .into_inner()
}

pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn rect(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> Vec<(f64, f64)> {
    vec![(lat0, lon0), (lat0, lon1), (lat1, lon1), (lat1, lon0)]
}

/// A small world: two real zones, a multi-part zone, a polygon with a hole,
/// an unsupported geometry and the test square.
pub fn world() -> String {
    feature_collection(&[
        polygon_feature("TestZone", &rect(0.0, 0.0, 10.0, 10.0)),
        polygon_feature("Europe/Berlin", &rect(47.0, 6.0, 55.0, 15.0)),
        multipolygon_feature(
            "America/New_York",
            &[&rect(40.0, -80.0, 45.0, -72.0), &rect(25.0, -82.0, 31.0, -80.0)],
        ),
        r#"{"type":"Feature","properties":{"tzid":"Asia/Tokyo"},"geometry":{"type":"Polygon","coordinates":[
            [[130,30],[145,30],[145,45],[130,45]],
            [[135,35],[140,35],[140,40],[135,40]]
        ]}}"#
            .to_string(),
        r#"{"type":"Feature","properties":{"tzid":"Etc/GMT"},"geometry":{"type":"Point","coordinates":[0,51.5]}}"#
            .to_string(),
    ])
}
