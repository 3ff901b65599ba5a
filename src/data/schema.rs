use super::model::{CanonicalField, SensorRecord};
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Raw → canonical mapping table
// ---------------------------------------------------------------------------

/// Header identifiers written by the drone's acquisition software, mapped to
/// the canonical field they carry. The table is total over
/// [`CanonicalField::ALL`].
pub const RAW_COLUMNS: [(&str, CanonicalField); 11] = [
    ("标准时间", CanonicalField::Timestamp),
    ("经度(Longitude)", CanonicalField::Longitude),
    ("纬度(Latitude)", CanonicalField::Latitude),
    ("高度(Altitude_m)", CanonicalField::Altitude),
    ("大气温度(℃)", CanonicalField::Temperature),
    ("大气湿度(%)", CanonicalField::Humidity),
    ("大气压(hPa)", CanonicalField::Pressure),
    ("工况PM2.5(ug/m3)", CanonicalField::Pm25),
    ("工况PM10(ug/m3)", CanonicalField::Pm10),
    ("NO2(ug/m3)", CanonicalField::No2),
    ("SO2(ug/m3)", CanonicalField::So2),
];

/// Raw source identifier for a canonical field.
pub fn raw_name(field: CanonicalField) -> &'static str {
    RAW_COLUMNS
        .iter()
        .find(|(_, f)| *f == field)
        .map(|(raw, _)| *raw)
        .unwrap_or_else(|| field.label())
}

/// Map a header cell to the canonical field it names, if any.
///
/// Both the raw identifier and the canonical label are accepted, so a log
/// re-exported after renaming still loads.
pub fn canonical_for(header: &str) -> Option<CanonicalField> {
    let h = normalize_header(header);
    RAW_COLUMNS
        .iter()
        .find(|(raw, _)| *raw == h)
        .map(|(_, f)| *f)
        .or_else(|| CanonicalField::ALL.into_iter().find(|f| f.label() == h))
}

fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

// ---------------------------------------------------------------------------
// Column index – where each canonical field lives in a given source
// ---------------------------------------------------------------------------

/// Source column position of every canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [usize; 11],
}

impl ColumnIndex {
    /// Resolve a header row. Fails with [`DataError::SchemaMismatch`] listing
    /// every raw identifier that could not be found. Extra columns are ignored;
    /// when a field appears twice the first occurrence wins.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> DataResult<ColumnIndex> {
        let mut found: [Option<usize>; 11] = [None; 11];
        for (pos, header) in headers.iter().enumerate() {
            if let Some(field) = canonical_for(header.as_ref()) {
                let slot = &mut found[field.index()];
                if slot.is_none() {
                    *slot = Some(pos);
                }
            }
        }

        let missing: Vec<String> = CanonicalField::ALL
            .iter()
            .filter(|f| found[f.index()].is_none())
            .map(|f| raw_name(*f).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::SchemaMismatch { missing });
        }

        let mut positions = [0usize; 11];
        for (slot, pos) in positions.iter_mut().zip(found) {
            *slot = pos.unwrap_or_default();
        }
        Ok(ColumnIndex { positions })
    }

    pub fn position(&self, field: CanonicalField) -> usize {
        self.positions[field.index()]
    }
}

// ---------------------------------------------------------------------------
// Record assembly
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Surrounding whitespace is ignored.
pub fn parse_number(text: &str, row: usize, field: CanonicalField) -> DataResult<f64> {
    let t = text.trim();
    t.parse::<f64>().map_err(|_| DataError::InvalidValue {
        row,
        column: field.label(),
        value: t.to_string(),
    })
}

/// Build a record from a timestamp and a per-field numeric lookup.
pub fn assemble_record<F>(timestamp: String, mut value: F) -> DataResult<SensorRecord>
where
    F: FnMut(CanonicalField) -> DataResult<f64>,
{
    Ok(SensorRecord {
        timestamp,
        longitude: value(CanonicalField::Longitude)?,
        latitude: value(CanonicalField::Latitude)?,
        altitude: value(CanonicalField::Altitude)?,
        temperature: value(CanonicalField::Temperature)?,
        humidity: value(CanonicalField::Humidity)?,
        pressure: value(CanonicalField::Pressure)?,
        pm25: value(CanonicalField::Pm25)?,
        pm10: value(CanonicalField::Pm10)?,
        no2: value(CanonicalField::No2)?,
        so2: value(CanonicalField::So2)?,
    })
}
