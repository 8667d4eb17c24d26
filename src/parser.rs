//! Decoding of GeoJSON timezone boundaries into the geometry model.
//!
//! Only the outer ring of each polygon part is kept; holes are decoded (and so
//! validated) but dropped. Bounding boxes are accumulated while vertices are
//! consumed, seeded from the first vertex of each ring.
//!
//! All decode state lives on the stack of the calling function, so any number
//! of loads may run concurrently.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::DecodeError;
use crate::index;
use crate::types::{BoundingBox, Collection, Feature, Geometry, Point, Ring};

/// A GeoJSON position, `[lon, lat]` with any further values (altitude) ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Latitude in decimal degrees
    pub lat: f64,
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Point::new(position.lat, position.lon)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PositionVisitor;

        impl<'de> Visitor<'de> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a position [lon, lat]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Position, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let lon = seq
                    .next_element::<f64>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let lat = seq
                    .next_element::<f64>()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Position { lon, lat })
            }
        }

        deserializer.deserialize_seq(PositionVisitor)
    }
}

/// A geometry object as it appears in the source document.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RawGeometry {
    /// `[[[lon, lat], ...], hole, ...]`
    Polygon {
        /// Outer ring followed by holes
        coordinates: Vec<Vec<Position>>,
    },
    /// `[[[[lon, lat], ...], hole, ...], ...]`
    MultiPolygon {
        /// One polygon (outer ring plus holes) per part
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// Any other geometry type. Decodes fine but never matches.
    #[serde(other)]
    Unsupported,
}

/// Converts a decoded geometry into rings with precomputed bounding boxes.
///
/// Unsupported geometry types produce an empty [`Geometry`] rather than an
/// error, so a single odd feature cannot fail the whole dataset.
pub fn parse_geometry(raw: &RawGeometry) -> Geometry {
    let mut bbox: Option<BoundingBox> = None;
    let rings = match raw {
        RawGeometry::Polygon { coordinates } => outer_ring(coordinates, &mut bbox)
            .into_iter()
            .collect(),
        RawGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .filter_map(|polygon| outer_ring(polygon, &mut bbox))
            .collect(),
        RawGeometry::Unsupported => Vec::new(),
    };
    Geometry::from_parts(rings, bbox)
}

/// Builds the outer ring of one polygon, widening `geometry_bbox` as it goes.
fn outer_ring(polygon: &[Vec<Position>], geometry_bbox: &mut Option<BoundingBox>) -> Option<Ring> {
    let outer = polygon.first()?;
    let mut points = Vec::with_capacity(outer.len());
    let mut ring_bbox: Option<BoundingBox> = None;

    for &position in outer {
        let point = Point::from(position);
        extend(&mut ring_bbox, point);
        extend(geometry_bbox, point);
        points.push(point);
    }

    Some(Ring::from_parts(points, ring_bbox))
}

#[inline]
fn extend(bbox: &mut Option<BoundingBox>, point: Point) {
    match bbox {
        Some(bbox) => bbox.extend(point),
        None => *bbox = Some(BoundingBox::from_point(point)),
    }
}

/// Decodes a single GeoJSON geometry object.
///
/// # Examples
///
/// ```
/// let geometry = geotz::parser::decode_geometry(
///     r#"{"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]]}"#,
/// )
/// .unwrap();
/// assert_eq!(geometry.rings().len(), 1);
/// assert_eq!(geometry.bbox().unwrap().max, geotz::Point::new(10.0, 10.0));
/// ```
pub fn decode_geometry(json: &str) -> Result<Geometry, DecodeError> {
    let raw: RawGeometry = serde_json::from_str(json)?;
    Ok(parse_geometry(&raw))
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default, deserialize_with = "geometry_or_empty")]
    geometry: Geometry,
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Deserialize)]
struct RawProperties {
    #[serde(default, alias = "TZID")]
    tzid: Option<String>,
}

/// Converts each feature's geometry as soon as it is decoded, so raw vertex
/// arrays for the whole document never exist at once.
fn geometry_or_empty<'de, D>(deserializer: D) -> Result<Geometry, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawGeometry>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(parse_geometry).unwrap_or_default())
}

/// Decodes a GeoJSON `FeatureCollection` and indexes the result.
///
/// Every feature must carry a `tzid` property. Any malformed coordinate
/// aborts the whole load.
///
/// # Examples
///
/// ```
/// let doc = br#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "properties": {"tzid": "Etc/GMT"},
///         "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]]}
///     }]
/// }"#;
/// let collection = geotz::parser::parse_collection(doc).unwrap();
/// assert_eq!(collection.features[0].tzid, "Etc/GMT");
/// ```
pub fn parse_collection(bytes: &[u8]) -> Result<Collection, DecodeError> {
    let raw: RawCollection = serde_json::from_slice(bytes)?;

    let features = raw
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let tzid = feature
                .properties
                .and_then(|p| p.tzid)
                .ok_or(DecodeError::MissingTzid { feature: idx })?;
            Ok(Feature::new(tzid, feature.geometry))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    let mut collection = Collection::new(features);
    index::index(&mut collection);

    tracing::debug!(
        features = collection.len(),
        rings = collection
            .features
            .iter()
            .map(|f| f.geometry.rings().len())
            .sum::<usize>(),
        "Parsed boundary document"
    );
    Ok(collection)
}
