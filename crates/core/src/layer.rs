//! Named vector layers.
//!
//! A [`Layer`] is the unit every engine operation consumes and produces: a
//! named, geometry-typed, CRS-tagged, ordered set of features. Layers are
//! created whole by derivation operations; after creation the only
//! record-set mutation is deletion of a subset, which bumps the layer
//! revision so outstanding selections can be detected as stale.

use crate::crs::CRS;
use crate::vector::{AttributeValue, Feature, GeometryType};
use geo_types::Geometry;
use std::collections::HashMap;

/// A named vector dataset held in a workspace.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    geometry_type: GeometryType,
    crs: Option<CRS>,
    features: Vec<Feature>,
    /// Ordered attribute schema
    fields: Vec<String>,
    /// Bumped whenever the record set changes
    revision: u64,
    next_id: u64,
}

impl Layer {
    /// Create an empty layer.
    pub fn new(name: impl Into<String>, geometry_type: GeometryType, crs: Option<CRS>) -> Self {
        Self {
            name: name.into(),
            geometry_type,
            crs,
            features: Vec::new(),
            fields: Vec::new(),
            revision: 0,
            next_id: 1,
        }
    }

    /// Add a feature, assigning it the next sequential object id.
    ///
    /// New attribute keys are appended to the schema in first-seen order.
    pub fn push(&mut self, geometry: Geometry<f64>, properties: HashMap<String, AttributeValue>) {
        for key in properties.keys() {
            if !self.fields.iter().any(|f| f == key) {
                self.fields.push(key.clone());
            }
        }
        self.features.push(Feature {
            id: self.next_id,
            geometry,
            properties,
        });
        self.next_id += 1;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: CRS) {
        self.crs = Some(crs);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Ordered attribute schema
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.features.iter_mut()
    }

    pub fn feature(&self, id: u64) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Object ids of all features, in layer order.
    pub fn ids(&self) -> Vec<u64> {
        self.features.iter().map(|f| f.id).collect()
    }

    /// Delete the features with the given ids, in place.
    ///
    /// Surviving features keep their ids. Returns the number of records
    /// removed and bumps the revision if any were.
    pub fn delete_ids(&mut self, ids: &[u64]) -> usize {
        let before = self.features.len();
        self.features.retain(|f| !ids.contains(&f.id));
        let removed = before - self.features.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    /// Append a field to the schema (no-op if already present).
    ///
    /// Used by attribute joins; does not touch the record set or revision.
    pub fn add_field(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.fields.iter().any(|f| f == &name) {
            self.fields.push(name);
        }
    }

    /// Rebuild this layer's features under a new name, renumbering object
    /// ids sequentially from 1. This is what every derivation operation
    /// (clip, project, buffer, materialize) does to its output.
    pub fn derive(
        &self,
        name: impl Into<String>,
        geometry_type: GeometryType,
        crs: Option<CRS>,
        features: impl IntoIterator<Item = (Geometry<f64>, HashMap<String, AttributeValue>)>,
    ) -> Layer {
        let mut out = Layer::new(name, geometry_type, crs);
        for (geometry, properties) in features {
            out.push(geometry, properties);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    fn point_layer(n: u64) -> Layer {
        let mut layer = Layer::new("pts", GeometryType::Point, Some(CRS::wgs84()));
        for i in 0..n {
            let mut props = HashMap::new();
            props.insert("NAME".to_string(), AttributeValue::String(format!("p{}", i)));
            layer.push(Geometry::Point(Point::new(i as f64, 0.0)), props);
        }
        layer
    }

    #[test]
    fn test_sequential_ids() {
        let layer = point_layer(3);
        assert_eq!(layer.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_delete_preserves_surviving_ids() {
        let mut layer = point_layer(5);
        let removed = layer.delete_ids(&[2, 4]);
        assert_eq!(removed, 2);
        assert_eq!(layer.ids(), vec![1, 3, 5]);
        assert_eq!(layer.revision(), 1);
    }

    #[test]
    fn test_delete_missing_ids_keeps_revision() {
        let mut layer = point_layer(2);
        let removed = layer.delete_ids(&[99]);
        assert_eq!(removed, 0);
        assert_eq!(layer.revision(), 0);
    }

    #[test]
    fn test_schema_first_seen_order() {
        let mut layer = Layer::new("l", GeometryType::Point, None);
        let mut props = HashMap::new();
        props.insert("A".to_string(), AttributeValue::Int(1));
        layer.push(Geometry::Point(Point::new(0.0, 0.0)), props);
        layer.add_field("B");
        layer.add_field("A");
        assert_eq!(layer.fields(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_derive_renumbers() {
        let mut layer = point_layer(4);
        layer.delete_ids(&[1, 2]);
        let derived = layer.derive(
            "copy",
            layer.geometry_type(),
            layer.crs().cloned(),
            layer.iter().map(|f| (f.geometry.clone(), f.properties.clone())),
        );
        assert_eq!(derived.ids(), vec![1, 2]);
        assert_eq!(derived.name(), "copy");
    }
}
