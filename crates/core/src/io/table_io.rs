//! CSV → AttributeTable (the population rank table).

use crate::error::Result;
use crate::table::AttributeTable;
use crate::vector::AttributeValue;
use std::path::Path;

/// Read a CSV file into an attribute table.
///
/// The first row is the header. Cell values are inferred: empty → null,
/// then integer, then float, otherwise string.
pub fn read_csv_table(path: impl AsRef<Path>, name: &str) -> Result<AttributeTable> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = AttributeTable::new(name, columns);
    for record in reader.records() {
        let record = record?;
        let row = record.iter().map(parse_cell).collect();
        table.push_row(row);
    }
    Ok(table)
}

fn parse_cell(cell: &str) -> AttributeValue {
    let cell = cell.trim();
    if cell.is_empty() {
        return AttributeValue::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return AttributeValue::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return AttributeValue::Float(f);
    }
    AttributeValue::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_rank_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Rank,City,Population").unwrap();
        writeln!(file, "1,Toronto,2731571").unwrap();
        writeln!(file, "2,Montreal,1704694").unwrap();
        writeln!(file, "3,Calgary,").unwrap();

        let table = read_csv_table(file.path(), "canadianCitiesPop").unwrap();
        assert_eq!(table.columns(), &["Rank", "City", "Population"]);
        assert_eq!(table.len(), 3);

        let index = table.key_index("Rank").unwrap();
        assert_eq!(index[&1][1], AttributeValue::String("Toronto".into()));
        assert!(index[&3][2].is_null());
    }

    #[test]
    fn test_cell_inference() {
        assert_eq!(parse_cell("42"), AttributeValue::Int(42));
        assert_eq!(parse_cell("4.5"), AttributeValue::Float(4.5));
        assert_eq!(parse_cell(" Regina "), AttributeValue::String("Regina".into()));
        assert_eq!(parse_cell(""), AttributeValue::Null);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_csv_table("/nonexistent/pop.csv", "pop").is_err());
    }
}
