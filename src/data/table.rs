// Column-major table of normalized records, one per loaded weekly file.

use chrono::{Local, TimeZone};

use crate::error::ChartError;
use crate::schema::{RecordKind, OPEN_TIME_KEY};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Rows of one record kind, keyed by the kind's canonical columns.
/// Column order follows the order declared by the schema; rows keep the
/// order they had in the source file.
#[derive(Debug, Clone)]
pub struct RecordTable {
    kind: RecordKind,
    keys: Vec<&'static str>,
    columns: Vec<Vec<Value>>,
}

impl RecordTable {
    pub(crate) fn new(kind: RecordKind, keys: Vec<&'static str>) -> Self {
        let columns = vec![Vec::new(); keys.len()];
        RecordTable { kind, keys, columns }
    }

    /// Appends one row. The loader guarantees the row matches the key count.
    pub(crate) fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.keys.len());
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, key: &str) -> Option<&[Value]> {
        let idx = self.keys.iter().position(|k| *k == key)?;
        Some(&self.columns[idx])
    }

    pub fn value(&self, row: usize, key: &str) -> Option<&Value> {
        self.column(key)?.get(row)
    }

    /// Joins two weekly tables row-wise, previous-week rows first. Purely
    /// positional: no deduplication, no gap detection across the week
    /// boundary.
    pub fn concat(prev: RecordTable, current: RecordTable) -> Result<RecordTable, ChartError> {
        if prev.kind != current.kind {
            return Err(ChartError::Config(format!(
                "cannot concatenate {:?} rows onto a {:?} table",
                current.kind, prev.kind
            )));
        }
        let mut merged = prev;
        for (dst, src) in merged.columns.iter_mut().zip(current.columns) {
            dst.extend(src);
        }
        Ok(merged)
    }

    /// Rewrites the candle open-time column in place, millisecond epoch
    /// integers to formatted local-time text.
    pub fn format_open_time(&mut self) -> Result<(), ChartError> {
        if self.kind != RecordKind::Candle {
            return Err(ChartError::Config(format!(
                "open-time formatting applies to candle tables, got {:?}",
                self.kind
            )));
        }
        let idx = self
            .keys
            .iter()
            .position(|k| *k == OPEN_TIME_KEY)
            .ok_or_else(|| ChartError::Config("candle table is missing its open-time column".to_string()))?;
        for value in &mut self.columns[idx] {
            match value {
                Value::Int(ms) => {
                    let formatted = format_millis(*ms, &Local).ok_or_else(|| {
                        ChartError::DataFormat(format!("open time {} cannot be rendered as a local datetime", ms))
                    })?;
                    *value = Value::Text(formatted);
                }
                other => {
                    return Err(ChartError::DataFormat(format!(
                        "open-time column holds {:?}, expected a millisecond epoch integer",
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Converts a millisecond epoch timestamp to `YYYY-MM-DD HH-MM-SS` in the
/// given timezone. Downstream consumers expect the hyphenated time
/// separators; the date part follows ISO order.
pub fn format_millis<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let datetime = tz.timestamp_millis_opt(ms).earliest()?;
    Some(datetime.format("%Y-%m-%d %H-%M-%S").to_string())
}
