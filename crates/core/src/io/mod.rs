//! I/O for source datasets: GeoJSON layers and CSV attribute tables.

mod geojson_io;
mod table_io;

pub use geojson_io::read_geojson_layer;
pub use table_io::read_csv_table;
