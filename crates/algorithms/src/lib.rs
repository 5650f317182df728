//! # Riparia Algorithms
//!
//! Vector geometry operations for the riparia ETL pipeline.
//!
//! ## Available operations
//!
//! - **vector**: clip to a polygon boundary, point buffers,
//!   within-distance predicate
//! - **projection**: Lambert Conformal Conic forward/inverse and
//!   geometry reprojection

pub mod projection;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::projection::{
        reproject_batch, reproject_geometry, LccParams, LccProjection, ProjectionError, Transform,
    };
    pub use crate::vector::{
        buffer_geometry, buffer_point, clip_to_boundary, point_geometry_distance, within_distance,
        BufferParams,
    };
}
