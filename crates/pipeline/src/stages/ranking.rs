//! Ranking refinement: drop near-river candidates, join the rank table,
//! prune null ranks.

use crate::config::RunConfig;
use crate::engine::{
    AttributePredicate, GeometryEngine, JoinOutcome, SelectionMode, SpatialRelation,
};
use crate::error::{PipelineError, Result, Stage};
use tracing::info;

const STAGE: Stage = Stage::RankingRefinement;

/// Counts produced by ranking refinement.
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    /// Candidates left after the near-river deletion (reported before the
    /// join as the "including null records" count)
    pub pre_join_count: usize,
    /// Near-river candidates removed
    pub near_deleted: usize,
    /// Join key match/mismatch counts
    pub join: JoinOutcome,
    /// Null-rank records removed after the join
    pub null_deleted: usize,
    /// Final ranked record count
    pub final_count: usize,
}

/// Remove near-river cities from the ranked-candidate layer, join the
/// rank table by object id, and delete every record left without a rank.
pub fn refine_ranking<E: GeometryEngine>(
    engine: &mut E,
    config: &RunConfig,
) -> Result<RankingOutcome> {
    let at = PipelineError::at(STAGE);
    let ranked = &config.outputs.ranked;
    let rivers = config.projected(&config.outputs.rivers);
    let threshold = config.threshold_meters();

    // The inverted selection is evaluated first: its size is the surviving
    // candidate count, reported before the join attaches any ranks.
    let far_sel = engine
        .select_by_location(
            ranked,
            SpatialRelation::WithinDistance(threshold),
            &rivers,
            SelectionMode::NewInverted,
        )
        .map_err(&at)?;
    let pre_join_count = far_sel.len();

    let near_sel = engine
        .select_by_location(
            ranked,
            SpatialRelation::WithinDistance(threshold),
            &rivers,
            SelectionMode::New,
        )
        .map_err(&at)?;
    let near_deleted = engine.delete_features(near_sel).map_err(&at)?;

    let join = engine
        .join_field(ranked, &config.rank_table, &config.rank_key_column)
        .map_err(&at)?;

    let null_sel = engine
        .select_by_attribute(
            ranked,
            AttributePredicate::IsNull {
                field: &config.rank_key_column,
            },
        )
        .map_err(&at)?;
    let null_deleted = engine.delete_features(null_sel).map_err(&at)?;

    let final_count = engine.count(ranked).map_err(&at)?;

    info!(
        near_deleted,
        matched = join.matched,
        unmatched = join.unmatched,
        null_deleted,
        final_count,
        "refined ranked candidates"
    );

    Ok(RankingOutcome {
        pre_join_count,
        near_deleted,
        join,
        null_deleted,
        final_count,
    })
}
