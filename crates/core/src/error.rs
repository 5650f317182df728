//! Error types for riparia-core

use thiserror::Error;

/// Main error type for core data-model and I/O operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layer '{0}' not found in workspace")]
    LayerNotFound(String),

    #[error("table '{0}' not found in workspace")]
    TableNotFound(String),

    #[error("field '{field}' not found on layer '{layer}'")]
    FieldNotFound { layer: String, field: String },

    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("GeoJSON parse error: {0}")]
    GeoJson(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("source '{0}' contains no features, cannot infer geometry type")]
    EmptySource(String),

    #[error("geometry type mismatch on layer '{layer}': expected {expected}, got {got}")]
    GeometryTypeMismatch {
        layer: String,
        expected: String,
        got: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for riparia-core operations
pub type Result<T> = std::result::Result<T, Error>;
