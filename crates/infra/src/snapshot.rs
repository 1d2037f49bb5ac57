//! Snapshot loading: raw records in, typed records out.
//!
//! Malformed records are skipped and counted instead of failing the whole
//! load. Only source failures abort.

use serde::{Deserialize, Serialize};

use ledgerlens_accounting::Expense;
use ledgerlens_core::{MetricsError, Record};
use ledgerlens_inventory::Product;
use ledgerlens_sales::Sale;
use ledgerlens_support::SupportConversation;

use crate::source::{RecordSource, SourceError};

/// Per-kind count of records dropped during conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecords {
    pub sales: usize,
    pub expenses: usize,
    pub products: usize,
    pub conversations: usize,
}

impl SkippedRecords {
    pub fn total(&self) -> usize {
        self.sales + self.expenses + self.products + self.conversations
    }
}

/// Immutable, fully typed view of the records at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub products: Vec<Product>,
    pub conversations: Vec<SupportConversation>,
    pub skipped: SkippedRecords,
}

impl Snapshot {
    /// Fetch every record list from `source` and convert it.
    pub fn load<S: RecordSource + ?Sized>(source: &S) -> Result<Self, SourceError> {
        let (sales, skipped_sales) = convert_all::<_, Sale>(source.list_sales()?);
        let (expenses, skipped_expenses) = convert_all::<_, Expense>(source.list_expenses()?);
        let (products, skipped_products) = convert_all::<_, Product>(source.list_products()?);
        let (conversations, skipped_conversations) =
            convert_all::<_, SupportConversation>(source.list_support_conversations()?);

        let skipped = SkippedRecords {
            sales: skipped_sales,
            expenses: skipped_expenses,
            products: skipped_products,
            conversations: skipped_conversations,
        };

        if skipped.total() > 0 {
            tracing::warn!(
                skipped_sales,
                skipped_expenses,
                skipped_products,
                skipped_conversations,
                "snapshot loaded with malformed records skipped"
            );
        }

        Ok(Self {
            sales,
            expenses,
            products,
            conversations,
            skipped,
        })
    }
}

fn convert_all<R, T>(raw: Vec<R>) -> (Vec<T>, usize)
where
    T: TryFrom<R, Error = MetricsError> + Record,
{
    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for (index, item) in raw.into_iter().enumerate() {
        match T::try_from(item) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                tracing::warn!(kind = T::KIND, index, error = %err, "skipping malformed record");
            }
        }
    }

    (records, skipped)
}
