//! Proximity classification: which cities sit within the threshold
//! distance of a river.

use crate::config::RunConfig;
use crate::engine::{GeometryEngine, MaterializeSource, SelectionMode, SpatialRelation};
use crate::error::{PipelineError, Result, Stage};
use tracing::info;

const STAGE: Stage = Stage::ProximityClassification;

/// Layers and counts produced by proximity classification.
#[derive(Debug, Clone)]
pub struct ProximityOutcome {
    pub buffer_layer: String,
    /// Near-river city subset
    pub near_layer: String,
    /// Full ranked-candidate copy
    pub ranked_layer: String,
    pub near_count: usize,
}

/// Buffer the projected cities, select the ones within the threshold of
/// a river, and materialize both the near-river subset and a full
/// ranked-candidate copy.
pub fn classify_proximity<E: GeometryEngine>(
    engine: &mut E,
    config: &RunConfig,
) -> Result<ProximityOutcome> {
    let at = PipelineError::at(STAGE);
    let cities = config.projected(&config.outputs.cities);
    let rivers = config.projected(&config.outputs.rivers);
    let threshold = config.threshold_meters();

    let buffer_layer = engine
        .buffer(&cities, threshold, &config.buffer_layer())
        .map_err(&at)?;

    let near_sel = engine
        .select_by_location(
            &cities,
            SpatialRelation::WithinDistance(threshold),
            &rivers,
            SelectionMode::New,
        )
        .map_err(&at)?;
    let near_count = near_sel.len();

    let near_layer = engine
        .materialize(MaterializeSource::Selection(&near_sel), &config.outputs.near)
        .map_err(&at)?;
    let ranked_layer = engine
        .materialize(MaterializeSource::Layer(&cities), &config.outputs.ranked)
        .map_err(&at)?;

    info!(
        near = near_count,
        distance = config.buffer_distance,
        unit = %config.buffer_unit,
        "classified city proximity to rivers"
    );

    Ok(ProximityOutcome {
        buffer_layer,
        near_layer,
        ranked_layer,
        near_count,
    })
}
