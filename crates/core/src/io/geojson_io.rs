//! GeoJSON FeatureCollection → Layer.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::vector::{AttributeValue, GeometryType};
use geojson::GeoJson;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read a GeoJSON FeatureCollection into a named layer.
///
/// The layer's geometry type is inferred from the first feature; features
/// of a different family are rejected. Features with null geometry are
/// skipped. Coordinates are taken as WGS84, as GeoJSON mandates.
pub fn read_geojson_layer(path: impl AsRef<Path>, name: &str) -> Result<Layer> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let gj: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| Error::GeoJson(e.to_string()))?;

    let collection = match gj {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(Error::GeoJson(format!(
                "{}: expected a FeatureCollection",
                path.display()
            )))
        }
    };

    let mut layer: Option<Layer> = None;
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let geometry = geo_types::Geometry::<f64>::try_from(geometry)
            .map_err(|e| Error::GeoJson(e.to_string()))?;
        let Some(family) = GeometryType::of(&geometry) else {
            continue;
        };

        let layer = layer.get_or_insert_with(|| {
            Layer::new(name, family, Some(CRS::wgs84()))
        });
        if family != layer.geometry_type() {
            return Err(Error::GeometryTypeMismatch {
                layer: name.to_string(),
                expected: layer.geometry_type().to_string(),
                got: family.to_string(),
            });
        }

        let mut properties = HashMap::new();
        if let Some(props) = feature.properties {
            for (key, value) in props {
                properties.insert(key, json_to_attribute(value));
            }
        }
        layer.push(geometry, properties);
    }

    layer.ok_or_else(|| Error::EmptySource(path.display().to_string()))
}

fn json_to_attribute(value: serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null,
        serde_json::Value::Bool(b) => AttributeValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Int(i)
            } else {
                AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => AttributeValue::String(s),
        other => AttributeValue::String(other.to_string()),
    }
}
