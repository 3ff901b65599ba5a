//! End-to-end tests of the load → cache → sample pipeline on real files.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use dadal_viewer::config::ViewerConfig;
use dadal_viewer::data::asset::load_logo;
use dadal_viewer::data::loader::load_file;
use dadal_viewer::data::schema::{raw_name, RAW_COLUMNS};
use dadal_viewer::state::{AppState, PreviewTable};
use dadal_viewer::{
    CanonicalField, DataError, DatasetCache, Measurement, SampledDataset, Stride,
};

// ============================================================================
// Fixtures
// ============================================================================

fn raw_header() -> String {
    RAW_COLUMNS
        .iter()
        .map(|(raw, _)| *raw)
        .collect::<Vec<_>>()
        .join(",")
}

/// Row `i` has altitude `100 + i` and temperature `20 + i / 10` so every
/// value identifies its source row.
fn csv_row(i: usize) -> String {
    format!(
        "2025-06-14 09:00:{:02},{},{},{},{},{},{},{},{},{},{}",
        i % 60,
        116.0 + i as f64 * 0.001,
        39.0 + i as f64 * 0.001,
        100.0 + i as f64,
        20.0 + i as f64 / 10.0,
        50.0 + i as f64,
        1000.0 - i as f64,
        10.0 + i as f64,
        20.0 + i as f64,
        5.0 + i as f64,
        1.0 + i as f64,
    )
}

fn write_csv(dir: &TempDir, name: &str, rows: usize) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "{}", raw_header()).unwrap();
    for i in 0..rows {
        writeln!(f, "{}", csv_row(i)).unwrap();
    }
    path
}

fn config_for(data: &Path) -> ViewerConfig {
    ViewerConfig {
        data_path: data.to_path_buf(),
        logo_path: PathBuf::from("definitely/missing/logo.jpg"),
        ..ViewerConfig::default()
    }
}

// ============================================================================
// Loader
// ============================================================================

#[test]
fn load_preserves_row_count_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 37);

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 37);
    for (i, r) in ds.records().iter().enumerate() {
        assert_eq!(r.altitude, 100.0 + i as f64);
    }
    assert_eq!(ds.source(), path.as_path());
}

#[test]
fn altitude_and_temperature_are_renamed_with_values_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 4);
    let ds = load_file(&path).unwrap();

    let table = PreviewTable::build(&ds, Measurement::Temperature, 50);
    assert_eq!(
        table.columns,
        vec![
            "Horodatage",
            "Longitude",
            "Latitude",
            "Altitude (m)",
            "Température (°C)"
        ]
    );

    let altitudes: Vec<f64> = ds
        .records()
        .iter()
        .map(|r| r.numeric(CanonicalField::Altitude).unwrap())
        .collect();
    let temperatures: Vec<f64> = ds
        .records()
        .iter()
        .map(|r| r.numeric(CanonicalField::Temperature).unwrap())
        .collect();
    assert_eq!(altitudes, vec![100.0, 101.0, 102.0, 103.0]);
    assert_eq!(temperatures, vec![20.0, 20.1, 20.2, 20.3]);
}

#[test]
fn missing_file_fails_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    match load_file(&path) {
        Err(DataError::NotFound { path: p }) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn missing_raw_column_fails_with_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.csv");
    let header: Vec<&str> = RAW_COLUMNS
        .iter()
        .map(|(raw, _)| *raw)
        .filter(|raw| *raw != raw_name(CanonicalField::So2))
        .collect();
    std::fs::write(&path, format!("{}\n", header.join(","))).unwrap();

    match load_file(&path) {
        Err(DataError::SchemaMismatch { missing }) => {
            assert_eq!(missing, vec!["SO2(ug/m3)".to_string()]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn canonical_headers_load_too() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renamed.csv");
    let header: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.label()).collect();
    std::fs::write(&path, format!("{}\n{}\n", header.join(","), csv_row(3))).unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.records()[0].altitude, 103.0);
}

#[test]
fn short_row_surfaces_csv_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, format!("{}\n2025-06-14 09:00:00,1,2\n", raw_header())).unwrap();
    assert!(matches!(load_file(&path), Err(DataError::Csv(_))));
}

#[test]
fn parquet_with_mixed_numeric_types_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flight.parquet");

    let n = 6usize;
    let mut fields = vec![Field::new(
        raw_name(CanonicalField::Timestamp),
        DataType::Utf8,
        false,
    )];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        (0..n).map(|i| format!("t{i}")).collect::<Vec<_>>(),
    ))];
    for field in &CanonicalField::ALL[1..] {
        if *field == CanonicalField::Altitude {
            fields.push(Field::new(raw_name(*field), DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(
                (0..n as i64).map(|i| 100 + i).collect::<Vec<_>>(),
            )));
        } else {
            fields.push(Field::new(raw_name(*field), DataType::Float32, false));
            columns.push(Arc::new(Float32Array::from(vec![1.5f32; n])));
        }
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), n);
    assert_eq!(ds.records()[5].timestamp, "t5");
    assert_eq!(ds.records()[5].altitude, 105.0);
    assert_eq!(ds.records()[0].pm25, 1.5);
}

#[test]
fn parquet_without_humidity_column_fails_with_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.parquet");

    let n = 3usize;
    let mut fields = vec![Field::new(
        raw_name(CanonicalField::Timestamp),
        DataType::Utf8,
        false,
    )];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        (0..n).map(|i| format!("t{i}")).collect::<Vec<_>>(),
    ))];
    for field in CanonicalField::ALL[1..]
        .iter()
        .filter(|f| **f != CanonicalField::Humidity)
    {
        fields.push(Field::new(raw_name(*field), DataType::Float32, false));
        columns.push(Arc::new(Float32Array::from(vec![1.0f32; n])));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    match load_file(&path) {
        Err(DataError::SchemaMismatch { missing }) => {
            assert_eq!(missing, vec!["大气湿度(%)".to_string()]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn second_get_returns_same_instance_without_reparse() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 10);
    let cache = DatasetCache::new(&path);

    let first = cache.get().unwrap();
    // Removing the source proves later calls never touch the file again.
    std::fs::remove_file(&path).unwrap();
    let second = cache.get().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.load_count(), 1);
    assert_eq!(second.len(), 10);
}

#[test]
fn concurrent_first_access_loads_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 2_000);
    let cache = Arc::new(DatasetCache::new(&path));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.get().unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(cache.load_count(), 1);
    for r in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], r));
    }
}

#[test]
fn not_found_propagates_through_cache() {
    let cache = DatasetCache::new("definitely/missing/flight.csv");
    assert!(cache.get().unwrap_err().is_not_found());
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn twenty_three_rows_stride_five_keeps_five() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 23);
    let ds = DatasetCache::new(&path).get().unwrap();

    let sample = SampledDataset::new(Arc::clone(&ds), Stride::new(5).unwrap());
    assert_eq!(sample.indices(), &[0, 5, 10, 15, 20]);
    for (i, r) in sample.iter().enumerate() {
        assert_eq!(r, &ds.records()[i * 5]);
    }
}

#[test]
fn stride_larger_than_dataset_keeps_first_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 3);
    let ds = load_file(&path).unwrap();
    let sample = SampledDataset::new(Arc::new(ds), Stride::new(5).unwrap());
    assert_eq!(sample.len(), 1);
    assert_eq!(sample.get(0).unwrap().altitude, 100.0);
}

#[test]
fn empty_log_samples_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 0);
    let ds = load_file(&path).unwrap();
    let sample = SampledDataset::new(Arc::new(ds), Stride::default());
    assert!(sample.is_empty());
}

// ============================================================================
// Application state
// ============================================================================

#[test]
fn missing_branding_does_not_stop_the_pipeline() {
    assert!(load_logo(Path::new("definitely/missing/logo.jpg")).is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 23);
    let state = AppState::new(config_for(&path));

    assert!(state.logo.is_none());
    assert!(state.fatal_error.is_none());
    let view = state.view.as_ref().unwrap();
    assert_eq!(view.sample.len(), 5);
    assert!(state.color_scale.is_some());
}

#[test]
fn preview_is_first_fifty_rows_of_full_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 80);
    let mut state = AppState::new(config_for(&path));
    state.select_measurement("NO2 (µg/m³)").unwrap();

    let preview = state.preview().unwrap();
    assert_eq!(preview.rows.len(), 50);
    assert_eq!(preview.columns[4], "NO2 (µg/m³)");
    // Row 1 of the full dataset, not of the sample.
    assert_eq!(preview.rows[1][3], "101.00");
    assert_eq!(preview.rows[1][4], "6.00");
}

#[test]
fn changing_measurement_refits_colour_scale_from_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 23);
    let mut state = AppState::new(config_for(&path));

    state.set_measurement(Measurement::Pm10);
    let scale = state.color_scale.as_ref().unwrap();
    // Sampled rows 0..=20 step 5 → PM10 = 20 + i.
    assert_eq!((scale.min, scale.max), (20.0, 40.0));
    assert_eq!(state.cache.load_count(), 1);
}

#[test]
fn opening_a_missing_file_sets_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "flight.csv", 5);
    let mut state = AppState::new(config_for(&path));
    assert!(state.fatal_error.is_none());

    state.open_source(dir.path().join("other.csv"));
    assert!(state.view.is_none());
    assert!(state.fatal_error.is_some());
}
