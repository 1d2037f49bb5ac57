use serde::{Deserialize, Serialize};

use ledgerlens_core::{MetricsError, MetricsResult, ProductId, Record};

/// Stock-keeping product as seen by the alert evaluator.
///
/// Quantity is mutated by inventory operations elsewhere; here it is a
/// read-only snapshot value, never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: u64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, quantity: u64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
        }
    }

    /// Build from a signed stock figure, rejecting negative quantities and
    /// blank names.
    pub fn try_new(id: ProductId, name: impl Into<String>, quantity: i64) -> MetricsResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetricsError::invalid_record(Self::KIND, "name cannot be empty"));
        }
        let quantity = u64::try_from(quantity).map_err(|_| {
            MetricsError::invalid_record(Self::KIND, format!("negative quantity {quantity}"))
        })?;
        Ok(Self::new(id, name, quantity))
    }
}

impl Record for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
