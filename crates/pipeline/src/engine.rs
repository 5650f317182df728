//! The geometry engine capability interface.
//!
//! Every spatial operation the pipeline consumes is a method on
//! [`GeometryEngine`], so stages can run against any implementation:
//! the in-memory engine in [`crate::memory`], or a test double. All
//! operations are name-based: they look layers up in the engine's
//! workspace store and register their outputs there.

use crate::error::EngineResult;
use riparia_core::{LayerInfo, Workspace, CRS};

/// A transient reference to a subset of one layer's records.
///
/// Selections carry the layer revision observed at creation; consuming
/// one after the layer's record set changed is a stale-selection error.
#[derive(Debug, Clone)]
pub struct Selection {
    layer: String,
    ids: Vec<u64>,
    revision: u64,
}

impl Selection {
    pub fn new(layer: impl Into<String>, ids: Vec<u64>, revision: u64) -> Self {
        Self {
            layer: layer.into(),
            ids,
            revision,
        }
    }

    /// Name of the layer the selection refers to
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Selected object ids, in layer order
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Layer revision observed when the selection was made
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Spatial relation for select-by-location.
#[derive(Debug, Clone, Copy)]
pub enum SpatialRelation {
    /// Minimum distance ≤ the threshold (layer units, non-strict)
    WithinDistance(f64),
}

/// How a select-by-location result is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Records satisfying the relation
    New,
    /// Records NOT satisfying the relation (selection-invert)
    NewInverted,
}

/// Attribute predicates for select-by-attribute.
#[derive(Debug, Clone, Copy)]
pub enum AttributePredicate<'a> {
    /// Exact equality on a named field
    Equals { field: &'a str, value: &'a str },
    /// Field is null or absent
    IsNull { field: &'a str },
}

/// Input to materialize: a selection's subset, or a whole layer.
#[derive(Debug, Clone, Copy)]
pub enum MaterializeSource<'a> {
    Selection(&'a Selection),
    Layer(&'a str),
}

/// Outcome of an attribute join.
///
/// `unmatched` counts records whose join key had no table entry. That is
/// an expected condition, not an error; those records carry null in every
/// joined column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    pub matched: usize,
    pub unmatched: usize,
}

/// The operation set the pipeline consumes.
pub trait GeometryEngine {
    /// The workspace new layers are registered in
    fn workspace(&self) -> &Workspace;

    /// Names of the workspace's layers, in insertion order
    fn list_layers(&self) -> Vec<String>;

    /// Metadata for a layer (workspace layers and source layers alike)
    fn describe(&self, layer: &str) -> EngineResult<LayerInfo>;

    /// Select records matching an attribute predicate
    fn select_by_attribute(
        &self,
        layer: &str,
        predicate: AttributePredicate<'_>,
    ) -> EngineResult<Selection>;

    /// Clip a layer to the polygon features of a boundary selection,
    /// producing a new layer
    fn clip(&mut self, layer: &str, boundary: &Selection, out_name: &str) -> EngineResult<String>;

    /// Reproject a layer into a target CRS, producing a new layer with
    /// identical record count and geometry type
    fn project(&mut self, layer: &str, target: &CRS, out_name: &str) -> EngineResult<String>;

    /// Buffer a point layer by a fixed distance, producing a polygon layer
    fn buffer(&mut self, layer: &str, distance: f64, out_name: &str) -> EngineResult<String>;

    /// Select records by spatial relation against a reference layer
    fn select_by_location(
        &self,
        layer: &str,
        relation: SpatialRelation,
        reference: &str,
        mode: SelectionMode,
    ) -> EngineResult<Selection>;

    /// Record count of a layer
    fn count(&self, layer: &str) -> EngineResult<usize>;

    /// Copy a selection subset or a whole layer into a new layer with
    /// renumbered object ids
    fn materialize(&mut self, source: MaterializeSource<'_>, out_name: &str)
        -> EngineResult<String>;

    /// Join a registered table onto a layer by object id against the
    /// table's key column; widens the schema in place
    fn join_field(&mut self, layer: &str, table: &str, table_key: &str)
        -> EngineResult<JoinOutcome>;

    /// Delete the selected records from their layer, in place.
    /// Consumes the selection; returns the number of records removed.
    fn delete_features(&mut self, selection: Selection) -> EngineResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_accessors() {
        let sel = Selection::new("cities", vec![2, 5, 9], 3);
        assert_eq!(sel.layer(), "cities");
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.revision(), 3);
        assert!(!sel.is_empty());
    }
}
