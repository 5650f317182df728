//! Vector geometry operations
//!
//! Operations on individual feature geometries:
//! - Clip: restrict a geometry to a polygon boundary
//! - Buffer: fixed-distance zones around point geometries
//! - Distance: minimum point-to-geometry distance and the
//!   within-distance predicate

mod buffer;
mod clip;
mod distance;

pub use buffer::{buffer_geometry, buffer_point, BufferParams};
pub use clip::clip_to_boundary;
pub use distance::{point_geometry_distance, within_distance};
