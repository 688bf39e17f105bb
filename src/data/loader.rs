use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::data::table::{RecordTable, Value};
use crate::error::ChartError;
use crate::schema::{Field, FieldType, RecordKind, SchemaRegistry};

/// Loads one comma-separated weekly file into a table keyed by the kind's
/// canonical columns.
///
/// The first line is a header and is discarded. Mapping is purely positional:
/// header text is decorative and never consulted; columns are trusted to
/// arrive in the kind's declared order. Every data line must carry exactly
/// the declared field count.
pub fn load(registry: &SchemaRegistry, kind: RecordKind, path: &Path) -> Result<RecordTable, ChartError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ChartError::FileNotFound { path: path.to_path_buf() },
        _ => ChartError::Io { source: e },
    })?;

    let fields = registry.fields(kind);
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        // Field-count validation is ours, so we keep the line number.
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut table = RecordTable::new(kind, registry.keys(kind).collect());
    for (idx, result) in rdr.records().enumerate() {
        // 1-based line number, accounting for the discarded header.
        let line = idx + 2;
        let record = result.map_err(|e| ChartError::Parse { line, message: e.to_string() })?;
        if record.len() != fields.len() {
            return Err(ChartError::Parse {
                line,
                message: format!("expected {} fields, found {}", fields.len(), record.len()),
            });
        }
        let mut row = Vec::with_capacity(fields.len());
        for (field, raw) in fields.iter().zip(record.iter()) {
            row.push(parse_field(field, raw, line)?);
        }
        table.push_row(row);
    }

    debug!(?kind, rows = table.len(), path = %path.display(), "loaded weekly file");
    Ok(table)
}

fn parse_field(field: &Field, raw: &str, line: usize) -> Result<Value, ChartError> {
    let trimmed = raw.trim();
    match field.ty {
        FieldType::Integer => trimmed.parse::<i64>().map(Value::Int).map_err(|e| ChartError::Parse {
            line,
            message: format!("field '{}': {} ('{}')", field.key, e, raw),
        }),
        FieldType::Float => trimmed.parse::<f64>().map(Value::Float).map_err(|e| ChartError::Parse {
            line,
            message: format!("field '{}': {} ('{}')", field.key, e, raw),
        }),
        FieldType::Text => Ok(Value::Text(raw.to_string())),
    }
}
