//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known id of WGS84 geographic coordinates.
pub const WGS84: u32 = 4326;

/// Well-known id of the Canada Lambert Conformal Conic projection
/// (ESRI id space; NAD83, standard parallels 50°N/70°N, origin 40°N 96°W).
pub const CANADA_LAMBERT: u32 = 102002;

/// Coordinate Reference System representation.
///
/// Identified primarily by a well-known numeric id (EPSG codes and ESRI
/// codes share the id space here), with optional WKT / PROJ fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// Well-known numeric id if known
    srid: Option<u32>,
    /// WKT representation
    wkt: Option<String>,
    /// PROJ string if available
    proj: Option<String>,
    /// Human-readable projection name, for reporting
    name: Option<String>,
}

impl CRS {
    /// Create a CRS from a well-known numeric id
    pub fn from_srid(code: u32) -> Self {
        Self {
            srid: Some(code),
            wkt: None,
            proj: None,
            name: known_name(code).map(str::to_string),
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            srid: None,
            wkt: Some(wkt.into()),
            proj: None,
            name: None,
        }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        Self {
            srid: None,
            wkt: None,
            proj: Some(proj.into()),
            name: None,
        }
    }

    /// WGS84 geographic CRS
    pub fn wgs84() -> Self {
        Self::from_srid(WGS84)
    }

    /// Canada Lambert Conformal Conic
    pub fn canada_lambert() -> Self {
        Self::from_srid(CANADA_LAMBERT)
    }

    /// Get the well-known numeric id if known
    pub fn srid(&self) -> Option<u32> {
        self.srid
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Get PROJ string
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// Human-readable name, falling back to the identifier
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.identifier())
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.srid, other.srid) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }
        false
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.srid {
            return format!("SRID:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        "Unknown".to_string()
    }
}

fn known_name(code: u32) -> Option<&'static str> {
    match code {
        WGS84 => Some("GCS_WGS_1984"),
        CANADA_LAMBERT => Some("Canada_Lambert_Conformal_Conic"),
        3857 => Some("WGS_1984_Web_Mercator_Auxiliary_Sphere"),
        _ => None,
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
