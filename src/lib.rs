//! D.Æᵖ.D.A.L. air viewer: loads a drone's atmospheric sensor log, samples
//! it and renders it as a 3D point cloud coloured by a chosen measurement.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod projection;
pub mod state;
pub mod ui;

pub use data::cache::DatasetCache;
pub use data::model::{CanonicalField, Dataset, Measurement, SensorRecord};
pub use data::sampling::{SampledDataset, Stride};
pub use error::{DataError, DataResult};
