//! Error taxonomy for engine operations and pipeline stages.

use riparia_algorithms::projection::ProjectionError;
use riparia_core::GeometryType;
use std::fmt;
use thiserror::Error;

/// The pipeline stage an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RegionExtraction,
    CatalogReprojection,
    ProximityClassification,
    RankingRefinement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RegionExtraction => "region extraction",
            Stage::CatalogReprojection => "layer catalog and reprojection",
            Stage::ProximityClassification => "proximity classification",
            Stage::RankingRefinement => "ranking refinement",
        };
        write!(f, "{}", name)
    }
}

/// Failures of individual engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] riparia_core::Error),

    #[error("selection on layer '{layer}' is stale: the record set changed after it was made")]
    StaleSelection { layer: String },

    #[error("{op} does not support {geometry_type} layer '{layer}'")]
    UnsupportedGeometry {
        op: &'static str,
        layer: String,
        geometry_type: GeometryType,
    },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("cannot project layer '{layer}': {source}")]
    Projection {
        layer: String,
        #[source]
        source: ProjectionError,
    },
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Fatal pipeline failures, tagged with the stage they aborted.
///
/// Join-key mismatches are deliberately absent: an unmatched join key is
/// an expected outcome, surfaced as a count and resolved by null-pruning.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage}: required source layer '{layer}' is missing")]
    MissingSource { stage: Stage, layer: String },

    #[error(
        "{stage}: {field} = '{value}' on layer '{layer}' matched {matches} feature(s), \
         expected exactly one"
    )]
    SelectionAmbiguity {
        stage: Stage,
        layer: String,
        field: String,
        value: String,
        matches: usize,
    },

    #[error("{stage} failed: {source}")]
    Engine {
        stage: Stage,
        #[source]
        source: EngineError,
    },
}

impl PipelineError {
    /// Adapter for tagging engine failures with their stage:
    /// `.map_err(PipelineError::at(Stage::RegionExtraction))`
    pub fn at(stage: Stage) -> impl Fn(EngineError) -> PipelineError {
        move |source| PipelineError::Engine { stage, source }
    }
}

/// Result type alias for pipeline stages
pub type Result<T> = std::result::Result<T, PipelineError>;
