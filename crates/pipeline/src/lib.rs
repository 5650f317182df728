//! # Riparia Pipeline
//!
//! The staged country-subset ETL workflow: region extraction, layer
//! catalog and reprojection, river-proximity classification, and
//! population-rank refinement.
//!
//! Spatial work goes through the [`engine::GeometryEngine`] trait;
//! [`memory::MemoryEngine`] is the in-memory implementation backed by
//! `riparia-algorithms`. Stages communicate through named layers in the
//! engine's workspace and transient [`engine::Selection`] handles.

pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod runner;
pub mod stages;

pub use config::{DistanceUnit, RunConfig};
pub use engine::{GeometryEngine, JoinOutcome, Selection};
pub use error::{EngineError, PipelineError, Stage};
pub use memory::MemoryEngine;
pub use runner::{run, RunSummary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DistanceUnit, RunConfig};
    pub use crate::engine::{
        AttributePredicate, GeometryEngine, JoinOutcome, MaterializeSource, Selection,
        SelectionMode, SpatialRelation,
    };
    pub use crate::error::{EngineError, PipelineError, Stage};
    pub use crate::memory::MemoryEngine;
    pub use crate::runner::{run, RunSummary};
    pub use crate::stages::{
        catalog_and_reproject, classify_proximity, extract_region, refine_ranking,
    };
}
