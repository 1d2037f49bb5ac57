//! Sales records and the cash-in predicate.
//!
//! Pure logic only: sales are supplied by the point-of-sale flow and are
//! read-only here.

pub mod sale;

pub use sale::{cash_in_total, is_cash_in, Sale, SaleStatus};
