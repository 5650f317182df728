//! Vector feature types: attribute values, geometry kinds, features.

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Integer view of the value, if it has one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "<null>"),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Geometry family of a layer.
///
/// Display names match the conventional shape-type vocabulary of desktop
/// GIS ("Point" / "Polyline" / "Polygon"), which is what the catalog
/// report prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Polyline,
    Polygon,
}

impl GeometryType {
    /// Classify a concrete geometry into its family.
    ///
    /// Multi-part geometries belong to the family of their parts.
    pub fn of(geom: &Geometry<f64>) -> Option<GeometryType> {
        match geom {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(GeometryType::Point),
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                Some(GeometryType::Polyline)
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) => {
                Some(GeometryType::Polygon)
            }
            _ => None,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryType::Point => write!(f, "Point"),
            GeometryType::Polyline => write!(f, "Polyline"),
            GeometryType::Polygon => write!(f, "Polygon"),
        }
    }
}

/// A vector feature: geometry, attributes, and a numeric object id.
///
/// Object ids are assigned by the owning [`Layer`](crate::layer::Layer)
/// when the feature is added; they are 1-based, sequential at creation,
/// and stable under record deletion.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Object id, unique within the owning layer
    pub id: u64,
    /// Feature geometry
    pub geometry: Geometry<f64>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
}

impl Feature {
    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Point};

    #[test]
    fn test_geometry_type_of() {
        let p = Geometry::Point(Point::new(0.0, 0.0));
        assert_eq!(GeometryType::of(&p), Some(GeometryType::Point));

        let l = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(GeometryType::of(&l), Some(GeometryType::Polyline));
    }

    #[test]
    fn test_geometry_type_display() {
        assert_eq!(GeometryType::Polyline.to_string(), "Polyline");
        assert_eq!(GeometryType::Point.to_string(), "Point");
    }

    #[test]
    fn test_attribute_value_null() {
        assert!(AttributeValue::Null.is_null());
        assert!(!AttributeValue::Int(3).is_null());
    }

    #[test]
    fn test_attribute_value_as_int() {
        assert_eq!(AttributeValue::Int(7).as_int(), Some(7));
        assert_eq!(AttributeValue::Float(7.0).as_int(), Some(7));
        assert_eq!(AttributeValue::Float(7.5).as_int(), None);
        assert_eq!(AttributeValue::String("7".into()).as_int(), None);
    }
}
