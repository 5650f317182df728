//! Pure-Rust Lambert Conformal Conic projection (Snyder 1987, USGS
//! formulas).
//!
//! Covers the geographic ↔ Canada Lambert Conformal Conic pair the
//! pipeline reprojects between. No external C dependencies (no libproj).

use geo::MapCoords;
use geo_types::{Coord, Geometry};
use riparia_core::crs::{self, CRS};
use thiserror::Error;

/// Projection resolution errors
#[derive(Error, Debug, PartialEq)]
pub enum ProjectionError {
    #[error("source layer has no spatial reference")]
    MissingCrs,

    #[error("unsupported projection: {from} -> {to}")]
    Unsupported { from: String, to: String },
}

// ── Ellipsoid and projection parameters ──────────────────────────────────

/// Parameters of an ellipsoidal Lambert Conformal Conic projection.
#[derive(Debug, Clone, Copy)]
pub struct LccParams {
    /// Semi-major axis (m)
    pub semi_major: f64,
    /// Inverse flattening 1/f
    pub inverse_flattening: f64,
    /// Latitude of origin (degrees)
    pub origin_lat: f64,
    /// Central meridian (degrees)
    pub central_meridian: f64,
    /// First standard parallel (degrees)
    pub standard_parallel_1: f64,
    /// Second standard parallel (degrees)
    pub standard_parallel_2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl LccParams {
    /// Canada Lambert Conformal Conic (id 102002): NAD83 / GRS80,
    /// origin 40°N 96°W, standard parallels 50°N and 70°N, metres.
    pub fn canada_lambert() -> Self {
        Self {
            semi_major: 6_378_137.0,
            inverse_flattening: 298.257_222_101,
            origin_lat: 40.0,
            central_meridian: -96.0,
            standard_parallel_1: 50.0,
            standard_parallel_2: 70.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

/// A configured Lambert Conformal Conic projection with precomputed
/// constants (Snyder 1987, Prof. Paper 1395, pp. 107-109).
#[derive(Debug, Clone, Copy)]
pub struct LccProjection {
    a: f64,
    e: f64,
    n: f64,
    f_big: f64,
    rho0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl LccProjection {
    pub fn new(params: LccParams) -> Self {
        let f = 1.0 / params.inverse_flattening;
        let e2 = 2.0 * f - f * f;
        let e = e2.sqrt();

        let phi0 = params.origin_lat.to_radians();
        let phi1 = params.standard_parallel_1.to_radians();
        let phi2 = params.standard_parallel_2.to_radians();

        let m1 = m_factor(phi1, e2);
        let m2 = m_factor(phi2, e2);
        let t0 = t_factor(phi0, e);
        let t1 = t_factor(phi1, e);
        let t2 = t_factor(phi2, e);

        // Cone constant n (Snyder eq. 15-8); for a single standard
        // parallel it degenerates to sin(phi1).
        let n = if (phi1 - phi2).abs() < 1e-12 {
            phi1.sin()
        } else {
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };
        let f_big = m1 / (n * t1.powf(n));
        let rho0 = params.semi_major * f_big * t0.powf(n);

        Self {
            a: params.semi_major,
            e,
            n,
            f_big,
            rho0,
            lon0: params.central_meridian.to_radians(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    pub fn canada_lambert() -> Self {
        Self::new(LccParams::canada_lambert())
    }

    /// Project geographic (longitude, latitude) in degrees to planar
    /// (easting, northing) in metres. Snyder eqs. 14-1 .. 15-2.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lam = lon_deg.to_radians();

        let rho = self.a * self.f_big * t_factor(phi, self.e).powf(self.n);
        let theta = self.n * (lam - self.lon0);

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();
        (x, y)
    }

    /// Invert planar (easting, northing) in metres back to geographic
    /// (longitude, latitude) in degrees. Snyder eqs. 15-9 .. 7-9, with
    /// the iterative latitude solution.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xp = x - self.false_easting;
        let yp = self.rho0 - (y - self.false_northing);

        let rho = self.n.signum() * (xp * xp + yp * yp).sqrt();
        let theta = xp.atan2(yp);
        let lam = theta / self.n + self.lon0;

        let t = (rho / (self.a * self.f_big)).powf(1.0 / self.n);

        // Iterate phi = pi/2 - 2 atan(t * ((1 - e sin phi)/(1 + e sin phi))^(e/2))
        let mut phi = std::f64::consts::FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..8 {
            let es = self.e * phi.sin();
            let next = std::f64::consts::FRAC_PI_2
                - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            if (next - phi).abs() < 1e-12 {
                phi = next;
                break;
            }
            phi = next;
        }

        (lam.to_degrees(), phi.to_degrees())
    }
}

/// m = cos φ / sqrt(1 − e² sin² φ)  (Snyder eq. 14-15)
fn m_factor(phi: f64, e2: f64) -> f64 {
    phi.cos() / (1.0 - e2 * phi.sin() * phi.sin()).sqrt()
}

/// t = tan(π/4 − φ/2) / ((1 − e sin φ)/(1 + e sin φ))^(e/2)  (Snyder eq. 15-9)
fn t_factor(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

// ── CRS-pair resolution ──────────────────────────────────────────────────

/// A resolved coordinate transform between two CRS.
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Source and target are equivalent
    Identity,
    /// Geographic → projected
    Forward(LccProjection),
    /// Projected → geographic
    Inverse(LccProjection),
}

impl Transform {
    /// Resolve the transform between two CRS.
    ///
    /// Supported pairs: any equivalent pair (identity), WGS84 ↔ Canada
    /// Lambert Conformal Conic. Anything else is `Unsupported`.
    pub fn between(source: &CRS, target: &CRS) -> Result<Transform, ProjectionError> {
        if source.is_equivalent(target) {
            return Ok(Transform::Identity);
        }
        match (source.srid(), target.srid()) {
            (Some(crs::WGS84), Some(crs::CANADA_LAMBERT)) => {
                Ok(Transform::Forward(LccProjection::canada_lambert()))
            }
            (Some(crs::CANADA_LAMBERT), Some(crs::WGS84)) => {
                Ok(Transform::Inverse(LccProjection::canada_lambert()))
            }
            _ => Err(ProjectionError::Unsupported {
                from: source.identifier(),
                to: target.identifier(),
            }),
        }
    }

    /// Apply the transform to one coordinate.
    pub fn apply(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Transform::Identity => coord,
            Transform::Forward(p) => {
                let (x, y) = p.forward(coord.x, coord.y);
                Coord { x, y }
            }
            Transform::Inverse(p) => {
                let (x, y) = p.inverse(coord.x, coord.y);
                Coord { x, y }
            }
        }
    }
}

/// Reproject a geometry coordinate-by-coordinate.
///
/// Structure and vertex count are preserved exactly.
pub fn reproject_geometry(geom: &Geometry<f64>, transform: &Transform) -> Geometry<f64> {
    geom.map_coords(|c| transform.apply(c))
}

/// Reproject a batch of geometries.
///
/// With the `parallel` feature this fans out across cores; geometries come
/// back in input order either way.
pub fn reproject_batch(geoms: &[Geometry<f64>], transform: &Transform) -> Vec<Geometry<f64>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        geoms
            .par_iter()
            .map(|g| reproject_geometry(g, transform))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        geoms
            .iter()
            .map(|g| reproject_geometry(g, transform))
            .collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
