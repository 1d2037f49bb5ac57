use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerlens_core::{Dated, ExpenseId, Record, Window};

/// Expense status. Flipped to `Paid` externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ExpenseStatus::Pending),
            "paid" => Some(ExpenseStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub created_at: DateTime<Utc>,
    pub amount: Decimal,
    pub status: ExpenseStatus,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        created_at: DateTime<Utc>,
        amount: Decimal,
        status: ExpenseStatus,
    ) -> Self {
        Self {
            id,
            created_at,
            amount,
            status,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.status, ExpenseStatus::Paid)
    }
}

impl Record for Expense {
    type Id = ExpenseId;
    const KIND: &'static str = "expense";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Dated for Expense {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An expense counts as cash out when it is paid and created inside `window`.
pub fn is_cash_out(expense: &Expense, window: &Window) -> bool {
    expense.is_paid() && window.contains(expense.created_at)
}

/// Sum of `amount` over cash-out expenses, plus how many contributed.
/// Saturates at the `Decimal` bounds.
pub fn cash_out_total(expenses: &[Expense], window: &Window) -> (Decimal, usize) {
    expenses
        .iter()
        .filter(|e| is_cash_out(e, window))
        .fold((Decimal::ZERO, 0), |(sum, n), e| (sum.saturating_add(e.amount), n + 1))
}
