use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorScale;
use crate::config::ViewerConfig;
use crate::data::asset::{load_logo, Logo};
use crate::data::cache::DatasetCache;
use crate::data::model::{CanonicalField, Dataset, Measurement, SensorRecord};
use crate::data::sampling::SampledDataset;
use crate::error::{DataError, DataResult};
use crate::projection::Camera;

// ---------------------------------------------------------------------------
// Raw-data preview
// ---------------------------------------------------------------------------

/// First rows of the full dataset, restricted to the columns the table shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    pub fn build(dataset: &Dataset, measurement: Measurement, limit: usize) -> Self {
        let fields = [
            CanonicalField::Timestamp,
            CanonicalField::Longitude,
            CanonicalField::Latitude,
            CanonicalField::Altitude,
            measurement.field(),
        ];
        let rows = dataset
            .records()
            .iter()
            .take(limit)
            .map(|r| fields.iter().map(|f| r.display_value(*f)).collect())
            .collect();
        PreviewTable {
            columns: fields.iter().map(|f| f.label()).collect(),
            rows,
        }
    }
}

/// Tooltip text for one plotted reading: time, position and the selected
/// measurement, one `label : value` line each.
pub fn hover_summary(record: &SensorRecord, measurement: Measurement) -> String {
    [
        CanonicalField::Timestamp,
        CanonicalField::Longitude,
        CanonicalField::Latitude,
        CanonicalField::Altitude,
        measurement.field(),
    ]
    .iter()
    .map(|f| format!("{} : {}", f.label(), record.display_value(*f)))
    .collect::<Vec<_>>()
    .join("\n")
}

// ---------------------------------------------------------------------------
// Loaded view: everything derived from one dataset
// ---------------------------------------------------------------------------

/// A dataset together with its sample, ready for rendering.
#[derive(Debug, Clone)]
pub struct LoadedView {
    pub dataset: Arc<Dataset>,
    pub sample: SampledDataset,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Load-once handle for the current source.
    pub cache: DatasetCache,

    /// Dataset and sample (None when loading failed).
    pub view: Option<LoadedView>,

    /// Measurement driving the colour scale.
    pub measurement: Measurement,

    /// Colour scale fitted to the sample for `measurement`.
    pub color_scale: Option<ColorScale>,

    pub camera: Camera,

    pub logo: Option<Logo>,

    /// Blocking error: when set, nothing but the message is rendered.
    pub fatal_error: Option<String>,

    /// Non-blocking message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and run the pipeline once for the configured source.
    pub fn new(config: ViewerConfig) -> Self {
        let logo = load_logo(&config.logo_path);
        let cache = DatasetCache::new(config.data_path.clone());
        let mut state = AppState {
            config,
            cache,
            view: None,
            measurement: Measurement::default(),
            color_scale: None,
            camera: Camera::default(),
            logo,
            fatal_error: None,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Pull the dataset from the cache and rebuild the sample and colours.
    /// Any load failure becomes the fatal error.
    pub fn refresh(&mut self) {
        match self.build_view() {
            Ok(view) => {
                self.view = Some(view);
                self.fatal_error = None;
                self.rebuild_color_scale();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.cache.source().display());
                self.view = None;
                self.color_scale = None;
                self.fatal_error = Some(user_message(&e));
            }
        }
    }

    fn build_view(&self) -> DataResult<LoadedView> {
        let dataset = self.cache.get()?;
        let stride = self.config.effective_stride(dataset.len())?;
        let sample = SampledDataset::new(Arc::clone(&dataset), stride);
        Ok(LoadedView { dataset, sample })
    }

    /// Switch to another source file. A new source is a new cache key.
    pub fn open_source(&mut self, path: PathBuf) {
        self.config.data_path = path.clone();
        self.cache = DatasetCache::new(path);
        self.camera = Camera::default();
        self.refresh();
    }

    pub fn set_measurement(&mut self, measurement: Measurement) {
        self.measurement = measurement;
        self.rebuild_color_scale();
    }

    /// Select a measurement by label. Labels outside the selectable set are
    /// rejected and leave the current selection untouched.
    pub fn select_measurement(&mut self, label: &str) -> DataResult<()> {
        match Measurement::from_label(label) {
            Some(m) => {
                self.set_measurement(m);
                Ok(())
            }
            None => {
                log::warn!("Rejected measurement selection '{label}'");
                Err(DataError::UnknownMeasurement(label.to_string()))
            }
        }
    }

    fn rebuild_color_scale(&mut self) {
        self.color_scale = self
            .view
            .as_ref()
            .map(|v| ColorScale::fit(&v.sample, self.measurement, self.config.opacity));
    }

    pub fn preview(&self) -> Option<PreviewTable> {
        self.view.as_ref().map(|v| {
            PreviewTable::build(&v.dataset, self.measurement, self.config.preview_rows)
        })
    }
}

/// Text shown to the user for a failed load.
fn user_message(e: &DataError) -> String {
    match e {
        DataError::NotFound { path } => format!(
            "⚠️ Fichier de données introuvable. Veuillez vérifier le chemin du fichier CSV ! ({})",
            path.display()
        ),
        other => format!("⚠️ Impossible de charger les données : {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(path: &str) -> AppState {
        AppState::new(ViewerConfig {
            data_path: PathBuf::from(path),
            logo_path: PathBuf::from("no/such/logo.jpg"),
            ..ViewerConfig::default()
        })
    }

    #[test]
    fn missing_data_file_blocks_rendering() {
        let state = state_for("no/such/data.csv");
        assert!(state.view.is_none());
        assert!(state.color_scale.is_none());
        let msg = state.fatal_error.as_deref().unwrap();
        assert!(msg.contains("introuvable"));
    }

    #[test]
    fn unknown_selection_is_rejected_and_kept() {
        let mut state = state_for("no/such/data.csv");
        state.set_measurement(Measurement::No2);
        let err = state.select_measurement("Altitude (m)").unwrap_err();
        assert!(matches!(err, DataError::UnknownMeasurement(_)));
        assert_eq!(state.measurement, Measurement::No2);
        state.select_measurement("SO2 (µg/m³)").unwrap();
        assert_eq!(state.measurement, Measurement::So2);
    }

    #[test]
    fn hover_summary_lists_time_position_and_measurement() {
        let record = SensorRecord {
            timestamp: "2025-06-14 09:00:05".into(),
            longitude: 116.3975,
            latitude: 39.9087,
            altitude: 152.5,
            temperature: 22.75,
            humidity: 55.0,
            pressure: 995.0,
            pm25: 30.0,
            pm10: 48.0,
            no2: 12.0,
            so2: 4.0,
        };
        let text = hover_summary(&record, Measurement::Pm25);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Horodatage : 2025-06-14 09:00:05");
        assert_eq!(lines[1], "Longitude : 116.397500");
        assert_eq!(lines[3], "Altitude (m) : 152.50");
        assert!(lines[4].ends_with(": 30.00"));
        assert!(lines[4].starts_with(Measurement::Pm25.label()));
    }

    #[test]
    fn missing_logo_does_not_stop_the_pipeline() {
        let state = state_for("no/such/data.csv");
        assert!(state.logo.is_none());
        assert_eq!(state.cache.load_count(), 1);
    }
}
