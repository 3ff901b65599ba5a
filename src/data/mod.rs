//! Data layer: core types, loading, caching and sampling.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet   (raw headers)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  schema   │  raw header → canonical field
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cache    │  load once, share Arc<Dataset>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ sampling  │  every k-th record → SampledDataset
//!   └──────────┘
//! ```

pub mod asset;
pub mod cache;
pub mod loader;
pub mod model;
pub mod sampling;
pub mod schema;
