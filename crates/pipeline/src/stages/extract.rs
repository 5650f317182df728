//! Region extraction: pick the boundary feature, clip everything to it.

use crate::config::RunConfig;
use crate::engine::{AttributePredicate, GeometryEngine};
use crate::error::{PipelineError, Result, Stage};
use tracing::info;

const STAGE: Stage = Stage::RegionExtraction;

/// The four clipped layers produced by region extraction.
#[derive(Debug, Clone)]
pub struct RegionLayers {
    pub cities: String,
    pub boundary: String,
    pub lakes: String,
    pub rivers: String,
}

/// Select the boundary region by attribute and clip all source layers
/// to it.
///
/// Fails before any clip if a source layer is absent, or if the region
/// predicate matches anything other than exactly one boundary feature.
/// Source layers are never modified.
pub fn extract_region<E: GeometryEngine>(
    engine: &mut E,
    config: &RunConfig,
) -> Result<RegionLayers> {
    let sources = &config.sources;
    for name in [
        &sources.cities,
        &sources.country,
        &sources.lakes,
        &sources.rivers,
    ] {
        if engine.describe(name).is_err() {
            return Err(PipelineError::MissingSource {
                stage: STAGE,
                layer: name.clone(),
            });
        }
    }

    let boundary_sel = engine
        .select_by_attribute(
            &sources.country,
            AttributePredicate::Equals {
                field: &config.region_field,
                value: &config.region_name,
            },
        )
        .map_err(PipelineError::at(STAGE))?;

    if boundary_sel.len() != 1 {
        return Err(PipelineError::SelectionAmbiguity {
            stage: STAGE,
            layer: sources.country.clone(),
            field: config.region_field.clone(),
            value: config.region_name.clone(),
            matches: boundary_sel.len(),
        });
    }

    let at = PipelineError::at(STAGE);
    let outputs = &config.outputs;
    let cities = engine
        .clip(&sources.cities, &boundary_sel, &outputs.cities)
        .map_err(&at)?;
    let boundary = engine
        .clip(&sources.country, &boundary_sel, &outputs.boundary)
        .map_err(&at)?;
    let lakes = engine
        .clip(&sources.lakes, &boundary_sel, &outputs.lakes)
        .map_err(&at)?;
    let rivers = engine
        .clip(&sources.rivers, &boundary_sel, &outputs.rivers)
        .map_err(&at)?;

    info!(region = %config.region_name, "clipped source layers to the boundary region");

    Ok(RegionLayers {
        cities,
        boundary,
        lakes,
        rivers,
    })
}
