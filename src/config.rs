use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::sampling::{Stride, DEFAULT_STRIDE};
use crate::error::{DataError, DataResult};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dadal.json";

// ---------------------------------------------------------------------------
// ViewerConfig – resolved settings
// ---------------------------------------------------------------------------

/// Settings of the viewer. Missing keys in a config file take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Sensor log to display.
    pub data_path: PathBuf,
    /// Optional branding image for the side panel.
    pub logo_path: PathBuf,
    /// Keep every `stride`-th record for the 3D view.
    pub stride: i64,
    /// Upper bound on plotted points; raises the stride when exceeded.
    pub max_points: Option<usize>,
    /// Rows shown in the raw-data table.
    pub preview_rows: usize,
    pub point_radius: f32,
    pub opacity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Simulated_UAV_Meteorological_Data.csv"),
            logo_path: PathBuf::from("logo.jpg"),
            stride: DEFAULT_STRIDE,
            max_points: None,
            preview_rows: 50,
            point_radius: 4.0,
            opacity: 0.85,
        }
    }
}

impl ViewerConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> DataResult<()> {
        Stride::new(self.stride)?;
        if self.max_points == Some(0) {
            return Err(DataError::InvalidConfiguration(
                "max_points must be at least 1".into(),
            ));
        }
        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            return Err(DataError::InvalidConfiguration(format!(
                "opacity must be in (0, 1], got {}",
                self.opacity
            )));
        }
        if !(self.point_radius.is_finite() && self.point_radius > 0.0) {
            return Err(DataError::InvalidConfiguration(format!(
                "point_radius must be positive, got {}",
                self.point_radius
            )));
        }
        Ok(())
    }

    /// Stride to use for a dataset of `len` records: the configured stride,
    /// raised if needed so at most `max_points` records are kept.
    pub fn effective_stride(&self, len: usize) -> DataResult<Stride> {
        let configured = Stride::new(self.stride)?;
        match self.max_points {
            Some(cap) => Ok(configured.max(Stride::for_point_cap(len, cap)?)),
            None => Ok(configured),
        }
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default)]
#[command(name = "dadal-viewer")]
#[command(about = "3D viewer for drone-collected atmospheric sensor logs")]
#[command(version)]
pub struct Args {
    /// JSON config file (defaults to ./dadal.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sensor log (.csv, .json or .parquet)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Branding image shown in the side panel
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Keep every N-th record in the 3D view
    #[arg(long, allow_negative_numbers = true)]
    pub stride: Option<i64>,

    /// Cap on plotted points
    #[arg(long)]
    pub max_points: Option<usize>,

    /// Rows shown in the raw-data table
    #[arg(long)]
    pub preview_rows: Option<usize>,
}

impl Args {
    /// Layer defaults, the config file and the command line, in that order.
    pub fn resolve(&self) -> Result<ViewerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                ViewerConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => ViewerConfig::default(),
        };

        if let Some(p) = &self.data {
            cfg.data_path = p.clone();
        }
        if let Some(p) = &self.logo {
            cfg.logo_path = p.clone();
        }
        if let Some(s) = self.stride {
            cfg.stride = s;
        }
        if let Some(m) = self.max_points {
            cfg.max_points = Some(m);
        }
        if let Some(n) = self.preview_rows {
            cfg.preview_rows = n;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
