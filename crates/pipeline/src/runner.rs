//! Sequential stage orchestration.

use crate::config::RunConfig;
use crate::engine::GeometryEngine;
use crate::error::Result;
use crate::stages::{
    catalog_and_reproject, classify_proximity, extract_region, refine_ranking, CatalogEntry,
    ProximityOutcome, RankingOutcome, RegionLayers,
};
use std::time::{Duration, Instant};
use tracing::info;

/// Everything a finished run reports.
#[derive(Debug)]
pub struct RunSummary {
    pub region: RegionLayers,
    pub catalog: Vec<CatalogEntry>,
    pub proximity: ProximityOutcome,
    pub ranking: RankingOutcome,
    pub elapsed: Duration,
}

/// Run the four stages in order against one engine.
///
/// Stages are strictly sequential: each consumes layers the previous one
/// registered. The first fatal error aborts the remaining stages.
pub fn run<E: GeometryEngine>(engine: &mut E, config: &RunConfig) -> Result<RunSummary> {
    let start = Instant::now();

    info!(region = %config.region_name, "starting pipeline run");
    let region = extract_region(engine, config)?;
    let catalog = catalog_and_reproject(engine, config)?;
    let proximity = classify_proximity(engine, config)?;
    let ranking = refine_ranking(engine, config)?;

    let elapsed = start.elapsed();
    info!(?elapsed, final_count = ranking.final_count, "pipeline run finished");

    Ok(RunSummary {
        region,
        catalog,
        proximity,
        ranking,
        elapsed,
    })
}
