//! In-memory geometry engine.
//!
//! Owns two workspace stores: a read-only source store (the world
//! dataset) and the active store every derived layer lands in. Lookups
//! try the active store first and fall back to the sources; mutation
//! (join, delete) is only ever applied to active layers.

use crate::engine::{
    AttributePredicate, GeometryEngine, JoinOutcome, MaterializeSource, Selection, SelectionMode,
    SpatialRelation,
};
use crate::error::{EngineError, EngineResult};
use geo_types::{Geometry, MultiPolygon, Polygon};
use riparia_algorithms::projection::{reproject_batch, ProjectionError, Transform};
use riparia_algorithms::vector::{buffer_geometry, clip_to_boundary, within_distance, BufferParams};
use riparia_core::{AttributeValue, GeometryType, Layer, LayerInfo, Workspace, CRS};
use tracing::debug;

/// Segments used to approximate buffer circles.
const BUFFER_SEGMENTS: usize = 32;

/// Geometry engine over in-memory workspace stores.
pub struct MemoryEngine {
    source: Workspace,
    active: Workspace,
}

impl MemoryEngine {
    /// Create an engine over a source store and an active (output) store.
    pub fn new(source: Workspace, active: Workspace) -> Self {
        Self { source, active }
    }

    /// The source store (world layers).
    pub fn sources(&self) -> &Workspace {
        &self.source
    }

    /// Consume the engine, returning the active store.
    pub fn into_workspace(self) -> Workspace {
        self.active
    }

    fn lookup(&self, name: &str) -> EngineResult<&Layer> {
        self.active
            .layer(name)
            .or_else(|| self.source.layer(name))
            .ok_or_else(|| riparia_core::Error::LayerNotFound(name.to_string()).into())
    }

    fn lookup_active_mut(&mut self, name: &str) -> EngineResult<&mut Layer> {
        self.active
            .layer_mut(name)
            .ok_or_else(|| riparia_core::Error::LayerNotFound(name.to_string()).into())
    }

    /// Resolve a selection against its layer, enforcing freshness.
    fn resolve<'a>(&'a self, selection: &Selection) -> EngineResult<&'a Layer> {
        let layer = self.lookup(selection.layer())?;
        if layer.revision() != selection.revision() {
            return Err(EngineError::StaleSelection {
                layer: selection.layer().to_string(),
            });
        }
        Ok(layer)
    }

    /// Collect the polygon geometry of a boundary selection.
    fn boundary_polygons(&self, selection: &Selection) -> EngineResult<MultiPolygon<f64>> {
        let layer = self.resolve(selection)?;
        if layer.geometry_type() != GeometryType::Polygon {
            return Err(EngineError::UnsupportedGeometry {
                op: "clip",
                layer: layer.name().to_string(),
                geometry_type: layer.geometry_type(),
            });
        }

        let mut polygons: Vec<Polygon<f64>> = Vec::new();
        for feature in layer.iter() {
            if !selection.ids().contains(&feature.id) {
                continue;
            }
            match &feature.geometry {
                Geometry::Polygon(p) => polygons.push(p.clone()),
                Geometry::MultiPolygon(mp) => polygons.extend(mp.0.iter().cloned()),
                Geometry::Rect(r) => polygons.push(r.to_polygon()),
                _ => {}
            }
        }
        Ok(MultiPolygon::new(polygons))
    }

    fn check_crs_match(&self, layer: &Layer, reference: &Layer) -> EngineResult<()> {
        if let (Some(a), Some(b)) = (layer.crs(), reference.crs()) {
            if !a.is_equivalent(b) {
                return Err(EngineError::CrsMismatch(a.identifier(), b.identifier()));
            }
        }
        Ok(())
    }
}

impl GeometryEngine for MemoryEngine {
    fn workspace(&self) -> &Workspace {
        &self.active
    }

    fn list_layers(&self) -> Vec<String> {
        self.active.layer_names()
    }

    fn describe(&self, layer: &str) -> EngineResult<LayerInfo> {
        let layer = self.lookup(layer)?;
        Ok(LayerInfo {
            name: layer.name().to_string(),
            geometry_type: layer.geometry_type(),
            record_count: layer.len(),
            crs: layer.crs().cloned(),
        })
    }

    fn select_by_attribute(
        &self,
        layer: &str,
        predicate: AttributePredicate<'_>,
    ) -> EngineResult<Selection> {
        let layer = self.lookup(layer)?;
        let field = match predicate {
            AttributePredicate::Equals { field, .. } | AttributePredicate::IsNull { field } => field,
        };
        if !layer.has_field(field) {
            return Err(riparia_core::Error::FieldNotFound {
                layer: layer.name().to_string(),
                field: field.to_string(),
            }
            .into());
        }

        let ids = layer
            .iter()
            .filter(|feature| match predicate {
                AttributePredicate::Equals { field, value } => match feature.get_property(field) {
                    Some(AttributeValue::String(s)) => s.as_str() == value,
                    Some(AttributeValue::Null) | None => false,
                    Some(other) => other.to_string() == value,
                },
                AttributePredicate::IsNull { field } => feature
                    .get_property(field)
                    .map_or(true, AttributeValue::is_null),
            })
            .map(|feature| feature.id)
            .collect();

        Ok(Selection::new(layer.name(), ids, layer.revision()))
    }

    fn clip(&mut self, layer: &str, boundary: &Selection, out_name: &str) -> EngineResult<String> {
        let boundary_polygons = self.boundary_polygons(boundary)?;
        let source = self.lookup(layer)?;

        let features: Vec<_> = source
            .iter()
            .filter_map(|feature| {
                clip_to_boundary(&feature.geometry, &boundary_polygons)
                    .map(|geometry| (geometry, feature.properties.clone()))
            })
            .collect();

        let out = source.derive(
            out_name,
            source.geometry_type(),
            source.crs().cloned(),
            features,
        );
        debug!(layer, out_name, records = out.len(), "clipped layer");
        self.active.insert_layer(out);
        Ok(out_name.to_string())
    }

    fn project(&mut self, layer: &str, target: &CRS, out_name: &str) -> EngineResult<String> {
        let source = self.lookup(layer)?;
        let source_crs = source.crs().ok_or_else(|| EngineError::Projection {
            layer: layer.to_string(),
            source: ProjectionError::MissingCrs,
        })?;
        let transform =
            Transform::between(source_crs, target).map_err(|e| EngineError::Projection {
                layer: layer.to_string(),
                source: e,
            })?;

        let geometries: Vec<Geometry<f64>> =
            source.iter().map(|f| f.geometry.clone()).collect();
        let projected = reproject_batch(&geometries, &transform);

        let features = projected
            .into_iter()
            .zip(source.iter().map(|f| f.properties.clone()));
        let out = source.derive(
            out_name,
            source.geometry_type(),
            Some(target.clone()),
            features.collect::<Vec<_>>(),
        );
        debug!(layer, out_name, records = out.len(), "projected layer");
        self.active.insert_layer(out);
        Ok(out_name.to_string())
    }

    fn buffer(&mut self, layer: &str, distance: f64, out_name: &str) -> EngineResult<String> {
        let source = self.lookup(layer)?;
        if source.geometry_type() != GeometryType::Point {
            return Err(EngineError::UnsupportedGeometry {
                op: "buffer",
                layer: layer.to_string(),
                geometry_type: source.geometry_type(),
            });
        }

        let params = BufferParams {
            distance,
            segments: BUFFER_SEGMENTS,
        };
        let features: Vec<_> = source
            .iter()
            .filter_map(|feature| {
                buffer_geometry(&feature.geometry, &params)
                    .map(|geometry| (geometry, feature.properties.clone()))
            })
            .collect();

        let out = source.derive(out_name, GeometryType::Polygon, source.crs().cloned(), features);
        debug!(layer, out_name, distance, "buffered layer");
        self.active.insert_layer(out);
        Ok(out_name.to_string())
    }

    fn select_by_location(
        &self,
        layer: &str,
        relation: SpatialRelation,
        reference: &str,
        mode: SelectionMode,
    ) -> EngineResult<Selection> {
        let layer = self.lookup(layer)?;
        let reference = self.lookup(reference)?;
        self.check_crs_match(layer, reference)?;

        let SpatialRelation::WithinDistance(distance) = relation;

        let mut ids = Vec::new();
        for feature in layer.iter() {
            let points = match &feature.geometry {
                Geometry::Point(p) => vec![*p],
                Geometry::MultiPoint(mp) => mp.0.clone(),
                _ => {
                    return Err(EngineError::UnsupportedGeometry {
                        op: "select by location",
                        layer: layer.name().to_string(),
                        geometry_type: layer.geometry_type(),
                    })
                }
            };

            let near = points.iter().any(|p| {
                reference
                    .iter()
                    .any(|r| within_distance(p, &r.geometry, distance))
            });
            let keep = match mode {
                SelectionMode::New => near,
                SelectionMode::NewInverted => !near,
            };
            if keep {
                ids.push(feature.id);
            }
        }

        Ok(Selection::new(layer.name(), ids, layer.revision()))
    }

    fn count(&self, layer: &str) -> EngineResult<usize> {
        Ok(self.lookup(layer)?.len())
    }

    fn materialize(
        &mut self,
        source: MaterializeSource<'_>,
        out_name: &str,
    ) -> EngineResult<String> {
        let out = match source {
            MaterializeSource::Selection(selection) => {
                let layer = self.resolve(selection)?;
                let features: Vec<_> = layer
                    .iter()
                    .filter(|f| selection.ids().contains(&f.id))
                    .map(|f| (f.geometry.clone(), f.properties.clone()))
                    .collect();
                layer.derive(out_name, layer.geometry_type(), layer.crs().cloned(), features)
            }
            MaterializeSource::Layer(name) => {
                let layer = self.lookup(name)?;
                let features: Vec<_> = layer
                    .iter()
                    .map(|f| (f.geometry.clone(), f.properties.clone()))
                    .collect();
                layer.derive(out_name, layer.geometry_type(), layer.crs().cloned(), features)
            }
        };
        debug!(out_name, records = out.len(), "materialized layer");
        self.active.insert_layer(out);
        Ok(out_name.to_string())
    }

    fn join_field(
        &mut self,
        layer: &str,
        table: &str,
        table_key: &str,
    ) -> EngineResult<JoinOutcome> {
        let table = self
            .active
            .table(table)
            .or_else(|| self.source.table(table))
            .ok_or_else(|| riparia_core::Error::TableNotFound(table.to_string()))?
            .clone();
        let index = table.key_index(table_key)?;
        let columns: Vec<String> = table.columns().to_vec();

        let target = self.lookup_active_mut(layer)?;
        for column in &columns {
            target.add_field(column.clone());
        }

        let mut outcome = JoinOutcome {
            matched: 0,
            unmatched: 0,
        };
        for feature in target.iter_mut() {
            match index.get(&(feature.id as i64)) {
                Some(row) => {
                    for (column, value) in columns.iter().zip(row.iter()) {
                        feature.set_property(column.clone(), value.clone());
                    }
                    outcome.matched += 1;
                }
                None => {
                    for column in &columns {
                        feature.set_property(column.clone(), AttributeValue::Null);
                    }
                    outcome.unmatched += 1;
                }
            }
        }
        debug!(
            layer,
            matched = outcome.matched,
            unmatched = outcome.unmatched,
            "joined table"
        );
        Ok(outcome)
    }

    fn delete_features(&mut self, selection: Selection) -> EngineResult<usize> {
        let layer = self.lookup_active_mut(selection.layer())?;
        if layer.revision() != selection.revision() {
            return Err(EngineError::StaleSelection {
                layer: selection.layer().to_string(),
            });
        }
        let removed = layer.delete_ids(selection.ids());
        debug!(layer = selection.layer(), removed, "deleted features");
        Ok(removed)
    }
}
