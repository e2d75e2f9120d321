//! Helm chart model and archive decoders.
//!
//! A packaged chart is an archive whose entries share a single top-level
//! directory named after the chart:
//!
//! ```text
//! mychart/
//!   Chart.yaml          — chart metadata (required)
//!   values.yaml         — default configuration values
//!   templates/*.yaml    — manifest templates
//!   charts/<sub>/...    — unpacked subcharts
//!   charts/<sub>.tgz    — packed subcharts
//!   ...                 — any other file
//! ```
//!
//! Decoders implement [`ChartLoader`] and turn a byte stream in one
//! packaging family into a [`Chart`]. Byte-level parsing is delegated to the
//! `tar`, `flate2` and `zip` crates.

pub mod assemble;
pub mod chart;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod tape_archive;
pub mod zip_archive;

// Re-exports for convenience.
pub use assemble::ChartAssembler;
pub use chart::{Chart, ChartFile, Template};
pub use error::{ChartError, Result};
pub use loader::ChartLoader;
pub use metadata::{ChartMetadata, Maintainer};
pub use tape_archive::TapeArchiveChartLoader;
pub use zip_archive::ZipChartLoader;
