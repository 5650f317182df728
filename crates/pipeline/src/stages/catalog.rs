//! Layer catalog and reprojection.

use crate::config::RunConfig;
use crate::engine::GeometryEngine;
use crate::error::{PipelineError, Result, Stage};
use riparia_core::GeometryType;
use tracing::info;

const STAGE: Stage = Stage::CatalogReprojection;

/// One catalog row: what a layer was, and what it was reprojected into.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub geometry_type: GeometryType,
    pub record_count: usize,
    /// Name of the reprojected counterpart
    pub projected: String,
}

/// Enumerate every layer in the workspace, describe it, and reproject it
/// into the target CRS under a `_Project`-suffixed name.
///
/// The layer list is snapshotted before the first reprojection, so newly
/// produced `_Project` layers are not themselves re-enumerated. Entry
/// order follows workspace insertion order and is meaningful for
/// reporting only.
pub fn catalog_and_reproject<E: GeometryEngine>(
    engine: &mut E,
    config: &RunConfig,
) -> Result<Vec<CatalogEntry>> {
    let at = PipelineError::at(STAGE);
    let target = config.target_crs();

    let names = engine.list_layers();
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let layer_info = engine.describe(&name).map_err(&at)?;
        let projected = engine
            .project(&name, &target, &config.projected(&name))
            .map_err(&at)?;

        info!(
            layer = %layer_info.name,
            geometry = %layer_info.geometry_type,
            records = layer_info.record_count,
            target = %target.name(),
            "reprojected layer"
        );
        entries.push(CatalogEntry {
            name: layer_info.name,
            geometry_type: layer_info.geometry_type,
            record_count: layer_info.record_count,
            projected,
        });
    }
    Ok(entries)
}
