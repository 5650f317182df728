//! Workspace store: a named container of layers and tables.
//!
//! One pipeline run operates on one workspace at a time. The workspace is
//! always passed as an explicit handle, never held as ambient global state,
//! so repeated runs and tests compose.

use crate::crs::CRS;
use crate::layer::Layer;
use crate::table::AttributeTable;
use crate::vector::GeometryType;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Metadata snapshot of a layer, for cataloging and reports.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    pub name: String,
    pub geometry_type: GeometryType,
    pub record_count: usize,
    pub crs: Option<CRS>,
}

/// A container of named vector layers and attribute tables.
///
/// Layer names are unique; inserting under an existing name replaces the
/// previous layer (overwrite-on-rerun semantics). Enumeration follows
/// insertion order, which the pipeline uses for reporting only, never for
/// correctness.
#[derive(Debug, Default)]
pub struct Workspace {
    location: PathBuf,
    name: String,
    layers: HashMap<String, Layer>,
    layer_order: Vec<String>,
    tables: HashMap<String, AttributeTable>,
}

impl Workspace {
    /// Create a workspace container at a logical location.
    pub fn create(location: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            location: location.as_ref().to_path_buf(),
            name: name.into(),
            layers: HashMap::new(),
            layer_order: Vec::new(),
            tables: HashMap::new(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a layer, replacing any existing layer of the same name.
    pub fn insert_layer(&mut self, layer: Layer) {
        let name = layer.name().to_string();
        if self.layers.insert(name.clone(), layer).is_none() {
            self.layer_order.push(name);
        }
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.get_mut(name)
    }

    pub fn contains_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        let removed = self.layers.remove(name);
        if removed.is_some() {
            self.layer_order.retain(|n| n != name);
        }
        removed
    }

    /// Layer names in insertion order.
    pub fn layer_names(&self) -> Vec<String> {
        self.layer_order.clone()
    }

    /// Metadata for one layer.
    pub fn describe(&self, name: &str) -> Option<LayerInfo> {
        self.layers.get(name).map(|layer| LayerInfo {
            name: layer.name().to_string(),
            geometry_type: layer.geometry_type(),
            record_count: layer.len(),
            crs: layer.crs().cloned(),
        })
    }

    pub fn insert_table(&mut self, table: AttributeTable) {
        self.tables.insert(table.name().to_string(), table);
    }

    pub fn table(&self, name: &str) -> Option<&AttributeTable> {
        self.tables.get(name)
    }

    /// Number of layers held.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
