//! Inventory snapshot types and the low-stock alert evaluator.
//!
//! This crate contains pure, deterministic logic (no IO, no HTTP, no storage).

pub mod alert;
pub mod product;

pub use alert::{
    evaluate_low_stock, evaluate_low_stock_default, is_low_stock, LowStockAlert,
    DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use product::Product;
