//! Clipping to a polygon boundary.
//!
//! Points are kept when they touch the boundary; lines and polygons are
//! cut to it. A bounding-rectangle prefilter rejects features that cannot
//! intersect the boundary before any exact geometry work runs.

use geo::{BooleanOps, BoundingRect, Intersects};
use geo_types::{Geometry, MultiLineString, MultiPoint, MultiPolygon, Point, Rect};

/// Clip a geometry to a polygon boundary.
///
/// Returns the clipped geometry, or `None` if nothing of the feature lies
/// within the boundary. Output geometry stays in the input's family:
/// points stay points, lines come back as (multi)linestrings, polygons as
/// multipolygons. One input feature yields at most one output feature.
pub fn clip_to_boundary(
    geom: &Geometry<f64>,
    boundary: &MultiPolygon<f64>,
) -> Option<Geometry<f64>> {
    let boundary_rect = boundary.bounding_rect()?;
    if !rects_overlap(&geom.bounding_rect()?, &boundary_rect) {
        return None;
    }

    match geom {
        Geometry::Point(p) => {
            if boundary.intersects(p) {
                Some(geom.clone())
            } else {
                None
            }
        }

        Geometry::MultiPoint(mp) => {
            let kept: Vec<Point<f64>> = mp
                .iter()
                .filter(|p| boundary.intersects(*p))
                .copied()
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Geometry::MultiPoint(MultiPoint::new(kept)))
            }
        }

        Geometry::LineString(ls) => {
            let clipped = boundary.clip(&MultiLineString::new(vec![ls.clone()]), false);
            line_result(clipped)
        }

        Geometry::MultiLineString(mls) => {
            let clipped = boundary.clip(mls, false);
            line_result(clipped)
        }

        Geometry::Polygon(poly) => {
            let clipped = boundary.intersection(poly);
            if clipped.0.is_empty() {
                None
            } else {
                Some(Geometry::MultiPolygon(clipped))
            }
        }

        Geometry::MultiPolygon(mp) => {
            let clipped = boundary.intersection(mp);
            if clipped.0.is_empty() {
                None
            } else {
                Some(Geometry::MultiPolygon(clipped))
            }
        }

        // Rects and lines are normalized by the readers; collections are
        // not clippable.
        _ => None,
    }
}

fn line_result(clipped: MultiLineString<f64>) -> Option<Geometry<f64>> {
    let mut parts: Vec<_> = clipped
        .0
        .into_iter()
        .filter(|ls| ls.0.len() >= 2)
        .collect();
    match parts.len() {
        0 => None,
        1 => Some(Geometry::LineString(parts.pop().unwrap())),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
    }
}

fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && a.max().x >= b.min().x
        && a.min().y <= b.max().y
        && a.max().y >= b.min().y
}
