//! Core data structures for timezone boundary data.
//!
//! This module defines the geometry model the rest of the crate operates on:
//!
//! - [`Point`] - A latitude/longitude pair
//! - [`BoundingBox`] - Tight axis-aligned box around a set of points
//! - [`Ring`] - One closed polygon contour with its precomputed box
//! - [`Geometry`] - All rings of one timezone plus an aggregate box
//! - [`Feature`] - A geometry tagged with its timezone identifier
//! - [`Collection`] - The ordered feature list a lookup scans
//!
//! Bounding boxes are computed once, while rings are built, and are never
//! recomputed afterwards. The persisted cache stores them verbatim.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// A coordinate pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use geotz::Point;
///
/// let p = Point::new(52.52, 13.405);
/// assert_eq!(p.lat, 52.52);
/// assert_eq!(p.lon, 13.405);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Point {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
}

impl Point {
    /// Constructs a new point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned bounding box with inclusive edges.
///
/// A box is always seeded from a real vertex and then widened, so it is the
/// tight min/max over everything that was added to it.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct BoundingBox {
    /// South-west corner (smallest latitude and longitude)
    pub min: Point,
    /// North-east corner (largest latitude and longitude)
    pub max: Point,
}

impl BoundingBox {
    /// Creates a degenerate box containing exactly `point`.
    pub fn from_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Widens the box so that it also covers `point`.
    pub fn extend(&mut self, point: Point) {
        if point.lat < self.min.lat {
            self.min.lat = point.lat;
        }
        if point.lon < self.min.lon {
            self.min.lon = point.lon;
        }
        if point.lat > self.max.lat {
            self.max.lat = point.lat;
        }
        if point.lon > self.max.lon {
            self.max.lon = point.lon;
        }
    }

    /// Widens the box so that it also covers `other`.
    pub fn union(&mut self, other: &BoundingBox) {
        self.extend(other.min);
        self.extend(other.max);
    }

    /// Returns `true` if `point` lies inside the box or on its edges.
    ///
    /// The same inclusive rule is used for features and rings, so box
    /// pruning never rejects a point the containment test would accept.
    ///
    /// # Examples
    ///
    /// ```
    /// use geotz::{BoundingBox, Point};
    ///
    /// let mut bbox = BoundingBox::from_point(Point::new(0.0, 0.0));
    /// bbox.extend(Point::new(10.0, 10.0));
    ///
    /// assert!(bbox.contains(Point::new(5.0, 5.0)));
    /// assert!(bbox.contains(Point::new(0.0, 10.0)));
    /// assert!(!bbox.contains(Point::new(10.5, 5.0)));
    /// ```
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.min.lat <= point.lat
            && point.lat <= self.max.lat
            && self.min.lon <= point.lon
            && point.lon <= self.max.lon
    }
}

/// Folds `points` into a tight box, seeded from the first point.
fn bounds_of<I: IntoIterator<Item = Point>>(points: I) -> Option<BoundingBox> {
    let mut points = points.into_iter();
    let mut bbox = BoundingBox::from_point(points.next()?);
    for point in points {
        bbox.extend(point);
    }
    Some(bbox)
}

/// One closed polygon contour.
///
/// The ring is implicitly closed: the last vertex connects back to the first
/// whether or not the source repeated it. Rings with fewer than three
/// vertices never contain anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Ring {
    points: Vec<Point>,
    bbox: Option<BoundingBox>,
}

impl Ring {
    /// Builds a ring and computes its bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use geotz::{Point, Ring};
    ///
    /// let ring = Ring::new(vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(0.0, 10.0),
    ///     Point::new(10.0, 10.0),
    /// ]);
    /// let bbox = ring.bbox().unwrap();
    /// assert_eq!(bbox.min, Point::new(0.0, 0.0));
    /// assert_eq!(bbox.max, Point::new(10.0, 10.0));
    /// ```
    pub fn new(points: Vec<Point>) -> Self {
        let bbox = bounds_of(points.iter().copied());
        Self { points, bbox }
    }

    /// Builds a ring from parts whose box was already accumulated.
    pub(crate) fn from_parts(points: Vec<Point>, bbox: Option<BoundingBox>) -> Self {
        Self { points, bbox }
    }

    /// The ring's vertices in source order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The tight box around all vertices, `None` for an empty ring.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// Whether the ring has enough vertices to enclose anything.
    pub fn is_testable(&self) -> bool {
        self.points.len() >= 3
    }
}

/// All rings belonging to one timezone feature.
///
/// A `Polygon` source yields one ring, a `MultiPolygon` one ring per part
/// and unrecognized geometry types yield none.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Geometry {
    pub(crate) rings: Vec<Ring>,
    bbox: Option<BoundingBox>,
}

impl Geometry {
    /// Builds a geometry whose aggregate box covers every ring's box.
    pub fn new(rings: Vec<Ring>) -> Self {
        let bbox = rings
            .iter()
            .filter_map(Ring::bbox)
            .fold(None::<BoundingBox>, |acc, bbox| match acc {
                Some(mut acc) => {
                    acc.union(bbox);
                    Some(acc)
                }
                None => Some(*bbox),
            });
        Self { rings, bbox }
    }

    /// A geometry that can never match.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(rings: Vec<Ring>, bbox: Option<BoundingBox>) -> Self {
        Self { rings, bbox }
    }

    /// The rings in index order.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// The aggregate box over all rings, `None` when there are no vertices.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }
}

/// A geometry tagged with the timezone it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Feature {
    /// IANA timezone identifier (e.g., "Europe/Berlin", "Etc/GMT+12")
    pub tzid: String,
    /// The boundary of the timezone
    pub geometry: Geometry,
}

impl Feature {
    /// Creates a feature from its timezone id and geometry.
    pub fn new(tzid: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            tzid: tzid.into(),
            geometry,
        }
    }
}

/// The ordered feature list that a lookup scans.
///
/// Order is ascending by the geometry's minimum longitude once
/// [`index`](crate::index::index) has run. The order only improves locality;
/// lookups still scan linearly.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Collection {
    /// Features in index order
    pub features: Vec<Feature>,
}

impl Collection {
    /// Wraps a list of features without reordering it.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ]
    }

    #[test]
    fn ring_bbox_is_tight() {
        let ring = Ring::new(vec![
            Point::new(-3.0, 7.0),
            Point::new(4.5, -2.0),
            Point::new(1.0, 12.25),
        ]);
        let bbox = ring.bbox().unwrap();
        assert_eq!(bbox.min, Point::new(-3.0, -2.0));
        assert_eq!(bbox.max, Point::new(4.5, 12.25));
    }

    #[test]
    fn ring_bbox_is_not_biased_by_sentinels() {
        // Entirely in the south-east quadrant: a (90, -180)/(-90, 180) seed
        // would have produced a wrong box here.
        let ring = Ring::new(vec![Point::new(-10.0, 100.0), Point::new(-20.0, 110.0)]);
        let bbox = ring.bbox().unwrap();
        assert_eq!(bbox.max, Point::new(-10.0, 110.0));
        assert_eq!(bbox.min, Point::new(-20.0, 100.0));
    }

    #[test]
    fn empty_ring_has_no_bbox() {
        let ring = Ring::new(Vec::new());
        assert!(ring.bbox().is_none());
        assert!(!ring.is_testable());
    }

    #[test]
    fn geometry_bbox_covers_all_rings() {
        let far = Ring::new(vec![
            Point::new(40.0, -80.0),
            Point::new(41.0, -79.0),
            Point::new(40.0, -79.0),
        ]);
        let geometry = Geometry::new(vec![Ring::new(square()), far, Ring::new(Vec::new())]);
        let bbox = geometry.bbox().unwrap();
        assert_eq!(bbox.min, Point::new(0.0, -80.0));
        assert_eq!(bbox.max, Point::new(41.0, 10.0));
    }

    #[test]
    fn empty_geometry_has_no_bbox() {
        assert!(Geometry::empty().bbox().is_none());
        assert!(Geometry::new(vec![Ring::new(Vec::new())]).bbox().is_none());
    }

    #[test]
    fn bbox_contains_is_inclusive() {
        let bbox = Ring::new(square()).bbox().copied().unwrap();
        assert!(bbox.contains(Point::new(0.0, 0.0)));
        assert!(bbox.contains(Point::new(10.0, 10.0)));
        assert!(bbox.contains(Point::new(10.0, 5.0)));
        assert!(!bbox.contains(Point::new(-0.1, 5.0)));
        assert!(!bbox.contains(Point::new(5.0, 10.000001)));
    }
}
