//! Point-in-ring tests.
//!
//! [`contains`] is the authoritative predicate: ray-casting parity along a
//! horizontal ray from the query point toward +longitude. [`winding_number`]
//! computes the same answer for simple rings and can skip vertices (a
//! sampling stride) to act as a cheap pre-filter on very large rings.
//!
//! Both tests share one degenerate-case rule: when the query latitude equals
//! the latitude of any ring vertex, the latitude is moved once to the next
//! representable `f64` toward +infinity before any edge is tested. A vertex
//! shared by two edges therefore never counts twice, and the same query always
//! gets the same answer. There is no other tolerance; every other comparison
//! is exact IEEE-754.
//!
//! With this rule a point on the bottom-left corner of the square
//! `(0,0),(0,10),(10,10),(10,0)` is inside, while the top corners are outside.

use crate::types::{Point, Ring};

/// Returns the smallest `f64` greater than `x`.
///
/// `NaN` and `+inf` are returned unchanged; both zeros step to the smallest
/// positive subnormal.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// The latitude actually used to test `lat` against `points`.
#[inline]
fn query_lat(points: &[Point], lat: f64) -> f64 {
    if points.iter().any(|vertex| vertex.lat == lat) {
        next_up(lat)
    } else {
        lat
    }
}

/// Returns `true` if `point` is inside `ring` by ray-casting parity.
///
/// Rings with fewer than three vertices contain nothing. The ring is treated
/// as closed: the last vertex connects back to the first.
///
/// # Examples
///
/// ```
/// use geotz::{containment, Point, Ring};
///
/// let square = Ring::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 10.0),
///     Point::new(10.0, 10.0),
///     Point::new(10.0, 0.0),
/// ]);
///
/// assert!(containment::contains(&square, Point::new(5.0, 5.0)));
/// assert!(!containment::contains(&square, Point::new(15.0, 15.0)));
/// assert!(containment::contains(&square, Point::new(0.0, 0.0)));
/// ```
pub fn contains(ring: &Ring, point: Point) -> bool {
    let points = ring.points();
    if points.len() < 3 {
        return false;
    }

    let lat = query_lat(points, point.lat);
    let lon = point.lon;

    let mut inside = false;
    let mut start = points[points.len() - 1];
    for &end in points {
        if (start.lat > lat) != (end.lat > lat)
            && lon < start.lon + (lat - start.lat) * (end.lon - start.lon) / (end.lat - start.lat)
        {
            inside = !inside;
        }
        start = end;
    }
    inside
}

/// Twice the signed area of the triangle `a, b, p`.
///
/// Positive when `p` is left of the directed edge `a -> b` (longitude as x,
/// latitude as y).
#[inline]
fn is_left(a: Point, b: Point, p: Point) -> f64 {
    (b.lon - a.lon) * (p.lat - a.lat) - (p.lon - a.lon) * (b.lat - a.lat)
}

/// Winding number of `ring` around `point`, visiting every `stride`-th vertex.
///
/// With `stride == 1` every edge is visited and the result is exact: nonzero
/// exactly when [`contains`] returns `true` for simple rings. Larger strides
/// replace runs of `stride` edges by a single chord, from the last sampled
/// vertex back to the first, which approximates the ring to within
/// `stride` times the vertex spacing. A `stride` of zero is treated as one.
pub fn winding_number(ring: &Ring, point: Point, stride: usize) -> i32 {
    let points = ring.points();
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let stride = stride.max(1);
    let p = Point::new(query_lat(points, point.lat), point.lon);

    let mut winding = 0;
    let mut i = 0;
    while i < n {
        let j = if i + stride < n { i + stride } else { 0 };
        let (a, b) = (points[i], points[j]);
        if a.lat <= p.lat {
            if b.lat > p.lat && is_left(a, b, p) > 0.0 {
                winding += 1;
            }
        } else if b.lat <= p.lat && is_left(a, b, p) < 0.0 {
            winding -= 1;
        }
        i += stride;
    }
    winding
}

/// Sampled containment: `true` if the strided winding number is nonzero.
///
/// Only an approximation for `stride > 1`; callers that need an exact answer
/// must confirm with [`contains`].
pub fn contains_sampled(ring: &Ring, point: Point, stride: usize) -> bool {
    winding_number(ring, point, stride) != 0
}
