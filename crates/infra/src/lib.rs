//! Infrastructure layer: config, record sources, snapshot loading, reports.

pub mod config;
pub mod dashboard;
pub mod snapshot;
pub mod source;

pub use config::{ConfigError, MetricsConfig};
pub use dashboard::{Dashboard, DashboardReport};
pub use snapshot::{SkippedRecords, Snapshot};
pub use source::{InMemoryRecordSource, JsonFileSource, RecordSource, SourceError};
