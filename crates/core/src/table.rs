//! Tabular (non-spatial) data: the rank table joined onto city layers.

use crate::error::{Error, Result};
use crate::vector::AttributeValue;
use std::collections::HashMap;

/// An ordered-column attribute table.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<AttributeValue>>,
}

impl AttributeTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated
    /// to the column count.
    pub fn push_row(&mut self, mut row: Vec<AttributeValue>) {
        row.resize(self.columns.len(), AttributeValue::Null);
        self.rows.push(row);
    }

    pub fn rows(&self) -> impl Iterator<Item = &[AttributeValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Build an integer-key index over the given column.
    ///
    /// Rows whose key cell has no integer view are skipped; on duplicate
    /// keys the first row wins.
    pub fn key_index(&self, column: &str) -> Result<HashMap<i64, &[AttributeValue]>> {
        let key_col = self.column_index(column)?;
        let mut index = HashMap::new();
        for row in &self.rows {
            if let Some(key) = row[key_col].as_int() {
                index.entry(key).or_insert(row.as_slice());
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank_table() -> AttributeTable {
        let mut t = AttributeTable::new(
            "ranks",
            vec!["Rank".to_string(), "City".to_string(), "Population".to_string()],
        );
        t.push_row(vec![
            AttributeValue::Int(1),
            AttributeValue::String("Toronto".into()),
            AttributeValue::Int(2_731_571),
        ]);
        t.push_row(vec![
            AttributeValue::Int(2),
            AttributeValue::String("Montreal".into()),
            AttributeValue::Int(1_704_694),
        ]);
        t
    }

    #[test]
    fn test_key_index() {
        let t = rank_table();
        let index = t.key_index("Rank").unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&2][1], AttributeValue::String("Montreal".into()));
    }

    #[test]
    fn test_unknown_column() {
        let t = rank_table();
        assert!(t.key_index("Nope").is_err());
    }

    #[test]
    fn test_short_row_padded() {
        let mut t = rank_table();
        t.push_row(vec![AttributeValue::Int(3)]);
        let last = t.rows().last().unwrap();
        assert_eq!(last.len(), 3);
        assert!(last[1].is_null());
    }

    #[test]
    fn test_non_integer_keys_skipped() {
        let mut t = rank_table();
        t.push_row(vec![
            AttributeValue::String("n/a".into()),
            AttributeValue::String("Nowhere".into()),
            AttributeValue::Null,
        ]);
        let index = t.key_index("Rank").unwrap();
        assert_eq!(index.len(), 2);
    }
}
