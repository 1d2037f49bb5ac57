use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use ledgerlens_accounting::Expense;
use ledgerlens_inventory::Product;
use ledgerlens_sales::Sale;
use ledgerlens_support::SupportConversation;

use super::raw::{typed, Lenient};
use super::{RawConversation, RawExpense, RawProduct, RawSale, RecordSource, SourceError};

#[derive(Debug, Default)]
struct Records {
    sales: Vec<RawSale>,
    expenses: Vec<RawExpense>,
    products: Vec<RawProduct>,
    conversations: Vec<RawConversation>,
}

/// In-memory record source for tests/dev.
///
/// Writers may keep pushing records; every `list_*` call returns a copy of
/// what is stored at that moment.
#[derive(Debug, Default)]
pub struct InMemoryRecordSource {
    inner: RwLock<Records>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sale(&self, sale: RawSale) -> Result<(), SourceError> {
        self.write()?.sales.push(sale);
        Ok(())
    }

    pub fn push_expense(&self, expense: RawExpense) -> Result<(), SourceError> {
        self.write()?.expenses.push(expense);
        Ok(())
    }

    pub fn push_product(&self, product: RawProduct) -> Result<(), SourceError> {
        self.write()?.products.push(product);
        Ok(())
    }

    pub fn push_conversation(&self, conversation: RawConversation) -> Result<(), SourceError> {
        self.write()?.conversations.push(conversation);
        Ok(())
    }

    /// Replace a product's stock figure by id; `Ok(false)` when unknown.
    pub fn set_product_quantity(&self, id: &str, quantity: i64) -> Result<bool, SourceError> {
        let mut records = self.write()?;
        let product = records
            .products
            .iter_mut()
            .find(|p| p.id.as_ref().and_then(Lenient::as_typed).map(String::as_str) == Some(id));
        Ok(match product {
            Some(product) => {
                product.quantity = typed(quantity);
                true
            }
            None => false,
        })
    }

    pub fn with_sales<'a>(mut self, sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        self.records_mut().sales.extend(sales.into_iter().map(RawSale::from));
        self
    }

    pub fn with_expenses<'a>(mut self, expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        self.records_mut()
            .expenses
            .extend(expenses.into_iter().map(RawExpense::from));
        self
    }

    pub fn with_products<'a>(mut self, products: impl IntoIterator<Item = &'a Product>) -> Self {
        self.records_mut()
            .products
            .extend(products.into_iter().map(RawProduct::from));
        self
    }

    pub fn with_conversations<'a>(
        mut self,
        conversations: impl IntoIterator<Item = &'a SupportConversation>,
    ) -> Self {
        self.records_mut()
            .conversations
            .extend(conversations.into_iter().map(RawConversation::from));
        self
    }

    /// Exclusive access, so no lock is taken.
    fn records_mut(&mut self) -> &mut Records {
        self.inner.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, SourceError> {
        self.inner.write().map_err(|_| poisoned())
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> Vec<T>) -> Result<Vec<T>, SourceError> {
        let records = self.inner.read().map_err(|_| poisoned())?;
        Ok(f(&records))
    }
}

fn poisoned() -> SourceError {
    SourceError::Unavailable("in-memory source lock poisoned".to_string())
}

impl RecordSource for InMemoryRecordSource {
    fn list_sales(&self) -> Result<Vec<RawSale>, SourceError> {
        self.read(|r| r.sales.clone())
    }

    fn list_expenses(&self) -> Result<Vec<RawExpense>, SourceError> {
        self.read(|r| r.expenses.clone())
    }

    fn list_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        self.read(|r| r.products.clone())
    }

    fn list_support_conversations(&self) -> Result<Vec<RawConversation>, SourceError> {
        self.read(|r| r.conversations.clone())
    }
}
