//! # Riparia Core
//!
//! Core types and I/O for the riparia vector ETL pipeline.
//!
//! This crate provides:
//! - `Layer`: named, geometry-typed vector dataset with stable object ids
//! - `Workspace`: insertion-ordered container of layers and tables
//! - `AttributeTable`: tabular data for attribute joins
//! - `CRS`: coordinate reference system handling
//! - GeoJSON / CSV readers for source data

pub mod crs;
pub mod error;
pub mod io;
pub mod layer;
pub mod table;
pub mod vector;
pub mod workspace;

pub use crs::CRS;
pub use error::{Error, Result};
pub use layer::Layer;
pub use table::AttributeTable;
pub use vector::{AttributeValue, Feature, GeometryType};
pub use workspace::{LayerInfo, Workspace};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::layer::Layer;
    pub use crate::table::AttributeTable;
    pub use crate::vector::{AttributeValue, Feature, GeometryType};
    pub use crate::workspace::{LayerInfo, Workspace};
}
