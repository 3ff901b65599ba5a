use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CanonicalField – the eleven fixed columns of a sensor log
// ---------------------------------------------------------------------------

/// One of the eleven canonical columns every record exposes.
///
/// Declaration order is the column order used for display and for the
/// column index built by the schema resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Timestamp,
    Longitude,
    Latitude,
    Altitude,
    Temperature,
    Humidity,
    Pressure,
    Pm25,
    Pm10,
    No2,
    So2,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Timestamp,
        CanonicalField::Longitude,
        CanonicalField::Latitude,
        CanonicalField::Altitude,
        CanonicalField::Temperature,
        CanonicalField::Humidity,
        CanonicalField::Pressure,
        CanonicalField::Pm25,
        CanonicalField::Pm10,
        CanonicalField::No2,
        CanonicalField::So2,
    ];

    /// Display label used in the plot, legend and preview table.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::Timestamp => "Horodatage",
            CanonicalField::Longitude => "Longitude",
            CanonicalField::Latitude => "Latitude",
            CanonicalField::Altitude => "Altitude (m)",
            CanonicalField::Temperature => "Température (°C)",
            CanonicalField::Humidity => "Humidité (%)",
            CanonicalField::Pressure => "Pression Atmos. (hPa)",
            CanonicalField::Pm25 => "PM2.5 (µg/m³)",
            CanonicalField::Pm10 => "PM10 (µg/m³)",
            CanonicalField::No2 => "NO2 (µg/m³)",
            CanonicalField::So2 => "SO2 (µg/m³)",
        }
    }

    /// Position in [`CanonicalField::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_numeric(self) -> bool {
        self != CanonicalField::Timestamp
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Measurement – the quantities selectable for colouring
// ---------------------------------------------------------------------------

/// A measured quantity that can drive the colour scale.
///
/// Position and time columns are not selectable; the selector offers
/// exactly these seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Measurement {
    #[default]
    Temperature,
    Humidity,
    Pressure,
    Pm25,
    Pm10,
    No2,
    So2,
}

impl Measurement {
    pub const ALL: [Measurement; 7] = [
        Measurement::Temperature,
        Measurement::Humidity,
        Measurement::Pressure,
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::No2,
        Measurement::So2,
    ];

    pub fn field(self) -> CanonicalField {
        match self {
            Measurement::Temperature => CanonicalField::Temperature,
            Measurement::Humidity => CanonicalField::Humidity,
            Measurement::Pressure => CanonicalField::Pressure,
            Measurement::Pm25 => CanonicalField::Pm25,
            Measurement::Pm10 => CanonicalField::Pm10,
            Measurement::No2 => CanonicalField::No2,
            Measurement::So2 => CanonicalField::So2,
        }
    }

    pub fn label(self) -> &'static str {
        self.field().label()
    }

    /// Look up a measurement by its canonical label.
    pub fn from_label(label: &str) -> Option<Measurement> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.label() == label.trim())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SensorRecord – one row of the log
// ---------------------------------------------------------------------------

/// A single reading taken by the drone (one row of the source file).
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    /// Acquisition time, kept as the source text.
    pub timestamp: String,
    /// Degrees.
    pub longitude: f64,
    /// Degrees.
    pub latitude: f64,
    /// Metres.
    pub altitude: f64,
    /// °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// hPa.
    pub pressure: f64,
    /// µg/m³.
    pub pm25: f64,
    /// µg/m³.
    pub pm10: f64,
    /// µg/m³.
    pub no2: f64,
    /// µg/m³.
    pub so2: f64,
}

impl SensorRecord {
    /// Numeric value of a canonical field. `None` for the timestamp.
    pub fn numeric(&self, field: CanonicalField) -> Option<f64> {
        let v = match field {
            CanonicalField::Timestamp => return None,
            CanonicalField::Longitude => self.longitude,
            CanonicalField::Latitude => self.latitude,
            CanonicalField::Altitude => self.altitude,
            CanonicalField::Temperature => self.temperature,
            CanonicalField::Humidity => self.humidity,
            CanonicalField::Pressure => self.pressure,
            CanonicalField::Pm25 => self.pm25,
            CanonicalField::Pm10 => self.pm10,
            CanonicalField::No2 => self.no2,
            CanonicalField::So2 => self.so2,
        };
        Some(v)
    }

    pub fn measurement(&self, m: Measurement) -> f64 {
        // Measurement fields are always numeric.
        self.numeric(m.field()).unwrap_or(f64::NAN)
    }

    /// Spatial position as `[longitude, latitude, altitude]`.
    pub fn position(&self) -> [f64; 3] {
        [self.longitude, self.latitude, self.altitude]
    }

    /// Cell text for a canonical field, formatted for the preview table.
    pub fn display_value(&self, field: CanonicalField) -> String {
        match field {
            CanonicalField::Timestamp => self.timestamp.clone(),
            CanonicalField::Longitude | CanonicalField::Latitude => {
                format!("{:.6}", self.numeric(field).unwrap_or_default())
            }
            _ => format!("{:.2}", self.numeric(field).unwrap_or_default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded log
// ---------------------------------------------------------------------------

/// The full parsed log, in source row order. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    records: Vec<SensorRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<SensorRecord>) -> Self {
        Dataset {
            source: source.into(),
            records,
        }
    }

    /// Path the records were read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[SensorRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SensorRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
