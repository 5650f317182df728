//! Minimum point-to-geometry distance and the within-distance predicate.

use geo::{BoundingRect, Intersects};
use geo_types::{Coord, Geometry, LineString, Point, Polygon};

/// Minimum Euclidean distance from a point to a geometry, in layer units.
///
/// Distance to a polygon is zero when the point lies inside it.
pub fn point_geometry_distance(point: &Point<f64>, geom: &Geometry<f64>) -> f64 {
    let p = Coord {
        x: point.x(),
        y: point.y(),
    };
    match geom {
        Geometry::Point(q) => {
            let (dx, dy) = (q.x() - p.x, q.y() - p.y);
            (dx * dx + dy * dy).sqrt()
        }
        Geometry::MultiPoint(mp) => mp
            .iter()
            .map(|q| point_geometry_distance(point, &Geometry::Point(*q)))
            .fold(f64::INFINITY, f64::min),
        Geometry::Line(l) => point_segment_distance(p, l.start, l.end),
        Geometry::LineString(ls) => linestring_distance(p, ls),
        Geometry::MultiLineString(mls) => mls
            .0
            .iter()
            .map(|ls| linestring_distance(p, ls))
            .fold(f64::INFINITY, f64::min),
        Geometry::Polygon(poly) => polygon_distance(point, p, poly),
        Geometry::MultiPolygon(mp) => mp
            .0
            .iter()
            .map(|poly| polygon_distance(point, p, poly))
            .fold(f64::INFINITY, f64::min),
        Geometry::Rect(r) => polygon_distance(point, p, &r.to_polygon()),
        Geometry::GeometryCollection(gc) => gc
            .0
            .iter()
            .map(|g| point_geometry_distance(point, g))
            .fold(f64::INFINITY, f64::min),
        Geometry::Triangle(t) => polygon_distance(point, p, &t.to_polygon()),
    }
}

/// Non-strict within-distance predicate: minimum distance ≤ `distance`.
///
/// A bounding-rectangle check rejects far-away geometries before the exact
/// distance is computed.
pub fn within_distance(point: &Point<f64>, geom: &Geometry<f64>, distance: f64) -> bool {
    if let Some(rect) = geom.bounding_rect() {
        let (x, y) = (point.x(), point.y());
        if x < rect.min().x - distance
            || x > rect.max().x + distance
            || y < rect.min().y - distance
            || y > rect.max().y + distance
        {
            return false;
        }
    }
    point_geometry_distance(point, geom) <= distance
}

fn linestring_distance(p: Coord<f64>, ls: &LineString<f64>) -> f64 {
    if ls.0.len() == 1 {
        let (dx, dy) = (ls.0[0].x - p.x, ls.0[0].y - p.y);
        return (dx * dx + dy * dy).sqrt();
    }
    ls.0.windows(2)
        .map(|w| point_segment_distance(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

fn polygon_distance(point: &Point<f64>, p: Coord<f64>, poly: &Polygon<f64>) -> f64 {
    if poly.intersects(point) {
        return 0.0;
    }
    let mut min = linestring_distance(p, poly.exterior());
    for ring in poly.interiors() {
        min = min.min(linestring_distance(p, ring));
    }
    min
}

/// Distance from a point to the segment `a`-`b`.
fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);

    let len2 = abx * abx + aby * aby;
    let t = if len2 == 0.0 {
        0.0
    } else {
        ((apx * abx + apy * aby) / len2).clamp(0.0, 1.0)
    };

    let (cx, cy) = (a.x + t * abx, a.y + t * aby);
    let (dx, dy) = (p.x - cx, p.y - cy);
    (dx * dx + dy * dy).sqrt()
}
