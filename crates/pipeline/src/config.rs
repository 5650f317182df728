//! Run configuration.
//!
//! Source layer names, the region predicate, the buffer distance, the
//! target projection, the join fields, and every output name are
//! configuration, with the default Canada run as the default values.

use riparia_core::CRS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const METERS_PER_MILE: f64 = 1_609.344;

/// Linear distance units accepted for the buffer threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
    Meters,
}

impl DistanceUnit {
    /// Convert a value in this unit to metres (the projected CRS unit).
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Miles => value * METERS_PER_MILE,
            DistanceUnit::Kilometers => value * 1_000.0,
            DistanceUnit::Meters => value,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "miles" | "mile" | "mi" => Ok(DistanceUnit::Miles),
            "kilometers" | "km" => Ok(DistanceUnit::Kilometers),
            "meters" | "m" => Ok(DistanceUnit::Meters),
            other => Err(format!("unknown distance unit: {}", other)),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Kilometers => "kilometers",
            DistanceUnit::Meters => "meters",
        };
        write!(f, "{}", name)
    }
}

/// Source layer names in the world dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNames {
    pub cities: String,
    pub country: String,
    pub lakes: String,
    pub rivers: String,
}

impl Default for SourceNames {
    fn default() -> Self {
        Self {
            cities: "Cities".to_string(),
            country: "Country".to_string(),
            lakes: "Lakes".to_string(),
            rivers: "Rivers".to_string(),
        }
    }
}

/// Output layer names and derivation suffixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputNames {
    pub cities: String,
    pub boundary: String,
    pub lakes: String,
    pub rivers: String,
    /// Near-river city subset
    pub near: String,
    /// Ranked candidate layer
    pub ranked: String,
    pub project_suffix: String,
    pub buffer_suffix: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            cities: "cities_canada".to_string(),
            boundary: "canada_boundary".to_string(),
            lakes: "lakes_canada".to_string(),
            rivers: "rivers_canada".to_string(),
            near: "cities25".to_string(),
            ranked: "CaCitiesRanked".to_string(),
            project_suffix: "_Project".to_string(),
            buffer_suffix: "_Buffer".to_string(),
        }
    }
}

/// Full configuration of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Logical location of the output workspace
    pub workspace_location: PathBuf,
    /// Output workspace name
    pub workspace_name: String,
    /// Name field on the boundary layer
    pub region_field: String,
    /// Boundary feature to extract
    pub region_name: String,
    /// Buffer / proximity threshold
    pub buffer_distance: f64,
    pub buffer_unit: DistanceUnit,
    /// Well-known id of the target projection
    pub target_srid: u32,
    /// Registered name of the rank table
    pub rank_table: String,
    /// Rank-order column joined against object ids
    pub rank_key_column: String,
    pub sources: SourceNames,
    pub outputs: OutputNames,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workspace_location: PathBuf::from("."),
            workspace_name: "canada.gdb".to_string(),
            region_field: "CNTRY_NAME".to_string(),
            region_name: "Canada".to_string(),
            buffer_distance: 25.0,
            buffer_unit: DistanceUnit::Miles,
            target_srid: riparia_core::crs::CANADA_LAMBERT,
            rank_table: "canadianCitiesPop".to_string(),
            rank_key_column: "Rank".to_string(),
            sources: SourceNames::default(),
            outputs: OutputNames::default(),
        }
    }
}

impl RunConfig {
    /// The proximity threshold in metres.
    pub fn threshold_meters(&self) -> f64 {
        self.buffer_unit.to_meters(self.buffer_distance)
    }

    /// The target CRS.
    pub fn target_crs(&self) -> CRS {
        CRS::from_srid(self.target_srid)
    }

    /// Name of a layer's reprojected counterpart.
    pub fn projected(&self, layer: &str) -> String {
        format!("{}{}", layer, self.outputs.project_suffix)
    }

    /// Name of the city buffer layer.
    pub fn buffer_layer(&self) -> String {
        format!("{}{}", self.outputs.cities, self.outputs.buffer_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_canada_run() {
        let config = RunConfig::default();
        assert_eq!(config.region_name, "Canada");
        assert_eq!(config.target_srid, 102002);
        assert_eq!(config.outputs.near, "cities25");
        assert_eq!(config.outputs.ranked, "CaCitiesRanked");
    }

    #[test]
    fn test_threshold_meters() {
        let config = RunConfig::default();
        assert!((config.threshold_meters() - 40_233.6).abs() < 1e-9);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("mi".parse::<DistanceUnit>(), Ok(DistanceUnit::Miles));
        assert_eq!("KM".parse::<DistanceUnit>(), Ok(DistanceUnit::Kilometers));
        assert!("furlongs".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_derived_names() {
        let config = RunConfig::default();
        assert_eq!(config.projected("cities_canada"), "cities_canada_Project");
        assert_eq!(config.buffer_layer(), "cities_canada_Buffer");
    }
}
