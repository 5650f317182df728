//! Fixed-distance buffers around point geometries.
//!
//! Each point becomes a regular polygon approximating a circle of the
//! buffer radius. Only point families are buffered here; the pipeline
//! buffers city layers, which are points by construction.

use geo_types::{Geometry, LineString, MultiPolygon, Point, Polygon};
use std::f64::consts::PI;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer radius in layer units
    pub distance: f64,
    /// Number of segments approximating the circle
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            segments: 32,
        }
    }
}

/// Buffer a single point into a circle polygon.
pub fn buffer_point(point: &Point<f64>, params: &BufferParams) -> Polygon<f64> {
    let n = params.segments.max(4);
    let r = params.distance.abs();

    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((point.x() + r * angle.cos(), point.y() + r * angle.sin()));
    }
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}

/// Buffer a point or multipoint geometry.
///
/// Returns `None` for non-point families.
pub fn buffer_geometry(geom: &Geometry<f64>, params: &BufferParams) -> Option<Geometry<f64>> {
    match geom {
        Geometry::Point(p) => Some(Geometry::Polygon(buffer_point(p, params))),
        Geometry::MultiPoint(mp) => {
            let polys: Vec<Polygon<f64>> =
                mp.iter().map(|p| buffer_point(p, params)).collect();
            Some(Geometry::MultiPolygon(MultiPolygon::new(polys)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::MultiPoint;

    #[test]
    fn test_circle_area_approximates_pi_r_squared() {
        let params = BufferParams {
            distance: 40_233.6, // 25 miles in metres
            segments: 64,
        };
        let poly = buffer_point(&Point::new(0.0, 0.0), &params);

        let expected = PI * params.distance * params.distance;
        let actual = poly.unsigned_area();
        let error = (actual - expected).abs() / expected;
        assert!(
            error < 0.01,
            "circle area error {:.2}% (expected {:.0}, got {:.0})",
            error * 100.0,
            expected,
            actual
        );
    }

    #[test]
    fn test_ring_is_closed() {
        let poly = buffer_point(&Point::new(3.0, 7.0), &BufferParams::default());
        let ring = poly.exterior();
        assert_eq!(ring.0.first(), ring.0.last());
        assert_eq!(ring.0.len(), 33);
    }

    #[test]
    fn test_multipoint_buffers_each_point() {
        let mp = Geometry::MultiPoint(MultiPoint::from(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        ]));
        let buffered = buffer_geometry(&mp, &BufferParams { distance: 5.0, segments: 16 });
        let Some(Geometry::MultiPolygon(out)) = buffered else {
            panic!("expected a multipolygon");
        };
        assert_eq!(out.0.len(), 2);
    }

    #[test]
    fn test_line_geometry_not_buffered() {
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
        assert!(buffer_geometry(&line, &BufferParams::default()).is_none());
    }
}
