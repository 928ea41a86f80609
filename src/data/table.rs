use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::data::value::FieldValue;
use crate::error::{Error, Result};

/// Read-only in-memory item table. Row index is the item identity that
/// marker member lists refer back to, so row order is never changed after
/// loading.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    fields: Vec<String>,
    columns: HashMap<String, Vec<FieldValue>>,
    rows: usize,
}

impl ItemTable {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let fields: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut columns: HashMap<String, Vec<FieldValue>> = fields
            .iter()
            .map(|f| (f.clone(), Vec::new()))
            .collect();
        if columns.len() != fields.len() {
            return Err(Error::Config("duplicate column header".to_string()));
        }
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record?;
            for (field, cell) in fields.iter().zip(record.iter()) {
                columns
                    .get_mut(field)
                    .expect("column exists for every header")
                    .push(FieldValue::parse(cell));
            }
            rows += 1;
        }

        info!(rows, fields = fields.len(), "loaded item table");
        Ok(Self {
            fields,
            columns,
            rows,
        })
    }

    /// Build a table directly from columns. Columns must be equal length.
    pub fn from_columns(columns: Vec<(&str, Vec<FieldValue>)>) -> Self {
        let rows = columns.first().map_or(0, |(_, c)| c.len());
        let fields = columns.iter().map(|(f, _)| f.to_string()).collect();
        let columns = columns
            .into_iter()
            .map(|(f, c)| {
                assert_eq!(c.len(), rows, "column {f} length mismatch");
                (f.to_string(), c)
            })
            .collect();
        Self {
            fields,
            columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn column(&self, field: &str) -> Result<&[FieldValue]> {
        self.columns
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownField {
                field: field.to_string(),
            })
    }

    pub fn value(&self, field: &str, row: usize) -> Result<&FieldValue> {
        let column = self.column(field)?;
        column.get(row).ok_or_else(|| Error::FieldType {
            field: field.to_string(),
            row,
            expected: "present",
            got: "missing row".to_string(),
        })
    }

    /// Numeric accessor for policy predicates (e.g. nomination counts).
    pub fn number(&self, field: &str, row: usize) -> Result<f64> {
        match self.value(field, row)? {
            FieldValue::Number(n) => Ok(*n),
            other => Err(Error::FieldType {
                field: field.to_string(),
                row,
                expected: "number",
                got: other.to_string(),
            }),
        }
    }
}
