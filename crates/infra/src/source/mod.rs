//! Record source abstraction: read-only snapshot accessors.

pub mod in_memory;
pub mod json_file;
pub mod raw;

use std::sync::Arc;

use thiserror::Error;

pub use in_memory::InMemoryRecordSource;
pub use json_file::{JsonFileSource, SnapshotDocument};
pub use raw::{typed, Lenient, RawConversation, RawExpense, RawProduct, RawSale};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    Parse(String),

    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies snapshots of raw records. Never written through.
pub trait RecordSource: Send + Sync {
    fn list_sales(&self) -> Result<Vec<RawSale>, SourceError>;
    fn list_expenses(&self) -> Result<Vec<RawExpense>, SourceError>;
    fn list_products(&self) -> Result<Vec<RawProduct>, SourceError>;
    fn list_support_conversations(&self) -> Result<Vec<RawConversation>, SourceError>;
}

impl<S> RecordSource for Arc<S>
where
    S: RecordSource + ?Sized,
{
    fn list_sales(&self) -> Result<Vec<RawSale>, SourceError> {
        (**self).list_sales()
    }

    fn list_expenses(&self) -> Result<Vec<RawExpense>, SourceError> {
        (**self).list_expenses()
    }

    fn list_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        (**self).list_products()
    }

    fn list_support_conversations(&self) -> Result<Vec<RawConversation>, SourceError> {
        (**self).list_support_conversations()
    }
}
