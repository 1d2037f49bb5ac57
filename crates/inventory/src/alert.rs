//! Low-stock alert evaluation.
//!
//! Stateless: every call evaluates the snapshot it is given. Dismissal or
//! visibility of alerts belongs to whoever renders them; callers re-fetch
//! products and re-evaluate whenever inventory changes.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Quantity at or below which a product is flagged.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 10;

/// A product flagged as critically low.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub name: String,
    pub quantity: u64,
}

/// `product.quantity <= threshold`.
pub fn is_low_stock(product: &Product, threshold: u64) -> bool {
    product.quantity <= threshold
}

/// Products at or below `threshold`, in input order.
pub fn evaluate_low_stock(products: &[Product], threshold: u64) -> Vec<LowStockAlert> {
    products
        .iter()
        .filter(|p| is_low_stock(p, threshold))
        .map(|p| LowStockAlert {
            name: p.name.clone(),
            quantity: p.quantity,
        })
        .collect()
}

pub fn evaluate_low_stock_default(products: &[Product]) -> Vec<LowStockAlert> {
    evaluate_low_stock(products, DEFAULT_LOW_STOCK_THRESHOLD)
}
