//! Ordering of features and rings for lookup locality.
//!
//! Rings inside each feature, and then the features themselves, are stably
//! sorted by the minimum longitude of their bounding boxes. Geometry without a
//! box (no vertices) sorts last because it can never match. The order is a
//! locality aid only: lookups still scan every feature.

use std::cmp::Ordering;

use crate::types::{BoundingBox, Collection};

/// Sorts rings and features by ascending min-longitude.
///
/// Both sorts are stable, so ties keep their source order and results for
/// points on shared boundaries stay deterministic. Running it again on an
/// indexed collection changes nothing.
pub fn index(collection: &mut Collection) {
    for feature in &mut collection.features {
        feature
            .geometry
            .rings
            .sort_by(|a, b| by_min_lon(a.bbox(), b.bbox()));
    }
    collection
        .features
        .sort_by(|a, b| by_min_lon(a.geometry.bbox(), b.geometry.bbox()));
}

fn by_min_lon(a: Option<&BoundingBox>, b: Option<&BoundingBox>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.min.lon.total_cmp(&b.min.lon),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns `true` if the collection is in index order.
pub fn is_indexed(collection: &Collection) -> bool {
    let features_sorted = collection.features.windows(2).all(|pair| {
        by_min_lon(pair[0].geometry.bbox(), pair[1].geometry.bbox()) != Ordering::Greater
    });
    features_sorted
        && collection.features.iter().all(|feature| {
            feature
                .geometry
                .rings()
                .windows(2)
                .all(|pair| by_min_lon(pair[0].bbox(), pair[1].bbox()) != Ordering::Greater)
        })
}
