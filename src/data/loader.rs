use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CanonicalField, Dataset, SensorRecord};
use super::schema::{assemble_record, parse_number, ColumnIndex};
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sensor log from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-separated, header row with raw identifiers (default)
/// * `.json`    – `[{ "标准时间": "...", "经度(Longitude)": 116.3, ... }, ...]`
/// * `.parquet` – one column per raw identifier
///
/// Columns may also carry the canonical labels instead of the raw ones.
/// Row order is preserved; nothing is filtered or deduplicated.
pub fn load_file(path: &Path) -> DataResult<Dataset> {
    let started = Instant::now();
    let file = open_source(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => read_parquet(file)?,
        "json" => read_json(file)?,
        _ => read_csv(file)?,
    };

    log::info!(
        "Loaded {} records from {} in {:.1?}",
        records.len(),
        path.display(),
        started.elapsed()
    );
    Ok(Dataset::new(path, records))
}

/// Open the source, folding every way of "not a readable file" into
/// [`DataError::NotFound`].
fn open_source(path: &Path) -> DataResult<File> {
    let not_found = || DataError::NotFound {
        path: path.to_path_buf(),
    };
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(not_found()),
    }
    File::open(path).map_err(|e| {
        log::debug!("Opening {} failed: {e}", path.display());
        not_found()
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(file: File) -> DataResult<Vec<SensorRecord>> {
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = |field: CanonicalField| record.get(index.position(field)).unwrap_or("");

        let timestamp = cell(CanonicalField::Timestamp).trim().to_string();
        records.push(assemble_record(timestamp, |field| {
            parse_number(cell(field), row, field)
        })?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented layout, the default of `df.to_json(orient='records')`.
/// Each object's keys are resolved like a CSV header.
fn read_json(file: File) -> DataResult<Vec<SensorRecord>> {
    let root: JsonValue = serde_json::from_reader(BufReader::new(file))?;
    let rows = root
        .as_array()
        .ok_or_else(|| DataError::UnsupportedFormat("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value.as_object().ok_or_else(|| {
            DataError::UnsupportedFormat(format!("row {row} is not a JSON object"))
        })?;

        let keys: Vec<&String> = obj.keys().collect();
        let index = ColumnIndex::resolve(&keys)?;
        let cells: Vec<&JsonValue> = obj.values().collect();
        let cell = |field: CanonicalField| cells[index.position(field)];

        let timestamp = match cell(CanonicalField::Timestamp) {
            JsonValue::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        records.push(assemble_record(timestamp, |field| {
            json_number(cell(field), row, field)
        })?);
    }
    Ok(records)
}

fn json_number(value: &JsonValue, row: usize, field: CanonicalField) -> DataResult<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| DataError::InvalidValue {
            row,
            column: field.label(),
            value: n.to_string(),
        }),
        JsonValue::String(s) => parse_number(s, row, field),
        other => Err(DataError::InvalidValue {
            row,
            column: field.label(),
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Numeric columns may be any Arrow type castable to Float64; the timestamp
/// column is cast to Utf8, so native timestamp columns load too.
fn read_parquet(file: File) -> DataResult<Vec<SensorRecord>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let index = ColumnIndex::resolve(&names)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = records.len();

        let timestamps = utf8_column(batch.column(index.position(CanonicalField::Timestamp)))?;
        let mut numeric: Vec<Float64Array> = Vec::with_capacity(10);
        for field in &CanonicalField::ALL[1..] {
            numeric.push(f64_column(batch.column(index.position(*field)))?);
        }

        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            let timestamp = if timestamps.is_null(i) {
                String::new()
            } else {
                timestamps.value(i).trim().to_string()
            };
            records.push(assemble_record(timestamp, |field| {
                // Timestamp is index 0, numeric columns start at 1.
                let col = &numeric[field.index() - 1];
                if col.is_null(i) {
                    Err(DataError::InvalidValue {
                        row,
                        column: field.label(),
                        value: "null".into(),
                    })
                } else {
                    Ok(col.value(i))
                }
            })?);
        }
    }
    Ok(records)
}

// -- Arrow helpers --

fn f64_column(col: &ArrayRef) -> DataResult<Float64Array> {
    let cast_col = cast(col, &DataType::Float64)?;
    cast_col
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| DataError::UnsupportedFormat(format!("cannot read {} as Float64", col.data_type())))
}

fn utf8_column(col: &ArrayRef) -> DataResult<StringArray> {
    let cast_col = cast(col, &DataType::Utf8)?;
    cast_col
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| DataError::UnsupportedFormat(format!("cannot read {} as Utf8", col.data_type())))
}
