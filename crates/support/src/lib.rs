//! Support ticketing records and KPI aggregation.
//!
//! Pure logic only. Display metadata for tags and teams is looked up through
//! the `Directory` collaborator.

pub mod conversation;
pub mod directory;
pub mod metrics;

pub use conversation::SupportConversation;
pub use directory::{Directory, InMemoryDirectory, NoDirectory, TagDisplay};
pub use metrics::{
    compute_support_metrics, compute_support_metrics_with, MetricsSnapshot, TagCount, TeamCount,
};
