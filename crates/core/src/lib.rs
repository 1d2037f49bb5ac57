//! `ledgerlens-core`: shared building blocks for the metrics engine.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the error
//! model, record traits, and calendar windows.

pub mod error;
pub mod id;
pub mod record;
pub mod window;

pub use error::{MetricsError, MetricsResult};
pub use id::{ConversationId, ExpenseId, ProductId, SaleId, TagId, TeamId};
pub use record::{Dated, Record};
pub use window::{in_window, resolve_window, Period, Window, WindowResolver};
