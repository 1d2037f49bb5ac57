//! Cash flow over a window: completed sales in, paid expenses out.

use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerlens_core::Window;
use ledgerlens_sales::{cash_in_total, Sale};

use crate::expense::{cash_out_total, Expense};

/// Cash position derived from one snapshot and one window.
///
/// Fields are read-only and deserialization re-checks that `balance` equals
/// `cash_in - cash_out`. Sums saturate at the `Decimal` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CashFlowParts")]
pub struct CashFlow {
    cash_in: Decimal,
    cash_out: Decimal,
    balance: Decimal,
    sales_count: usize,
    expenses_count: usize,
}

#[derive(Deserialize)]
struct CashFlowParts {
    cash_in: Decimal,
    cash_out: Decimal,
    balance: Decimal,
    sales_count: usize,
    expenses_count: usize,
}

impl TryFrom<CashFlowParts> for CashFlow {
    type Error = String;

    fn try_from(parts: CashFlowParts) -> Result<Self, Self::Error> {
        let flow = CashFlow::new(parts.cash_in, parts.cash_out)
            .with_counts(parts.sales_count, parts.expenses_count);
        if flow.balance() != parts.balance {
            return Err(format!(
                "balance {} does not match cash_in - cash_out = {}",
                parts.balance, flow.balance()
            ));
        }
        Ok(flow)
    }
}

impl Default for CashFlow {
    fn default() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }
}

impl CashFlow {
    pub fn new(cash_in: Decimal, cash_out: Decimal) -> Self {
        Self {
            cash_in,
            cash_out,
            balance: cash_in.saturating_sub(cash_out),
            sales_count: 0,
            expenses_count: 0,
        }
    }

    /// Attach the number of contributing sales and expenses.
    pub fn with_counts(mut self, sales_count: usize, expenses_count: usize) -> Self {
        self.sales_count = sales_count;
        self.expenses_count = expenses_count;
        self
    }

    pub fn cash_in(&self) -> Decimal {
        self.cash_in
    }

    pub fn cash_out(&self) -> Decimal {
        self.cash_out
    }

    /// `cash_in - cash_out`.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Number of sales that contributed to `cash_in`.
    pub fn sales_count(&self) -> usize {
        self.sales_count
    }

    /// Number of expenses that contributed to `cash_out`.
    pub fn expenses_count(&self) -> usize {
        self.expenses_count
    }

    /// Merge two partial results (e.g. from different record shards).
    pub fn combine(self, other: CashFlow) -> CashFlow {
        CashFlow::new(
            self.cash_in.saturating_add(other.cash_in),
            self.cash_out.saturating_add(other.cash_out),
        )
        .with_counts(
            self.sales_count + other.sales_count,
            self.expenses_count + other.expenses_count,
        )
    }
}

impl Add for CashFlow {
    type Output = CashFlow;

    fn add(self, rhs: CashFlow) -> CashFlow {
        self.combine(rhs)
    }
}

impl Sum for CashFlow {
    fn sum<I: Iterator<Item = CashFlow>>(iter: I) -> CashFlow {
        iter.fold(CashFlow::default(), CashFlow::combine)
    }
}

/// Reduce sales and expenses into the cash position for `window`.
///
/// Empty inputs yield zeros.
pub fn compute_cash_flow(sales: &[Sale], expenses: &[Expense], window: &Window) -> CashFlow {
    let (cash_in, sales_count) = cash_in_total(sales, window);
    let (cash_out, expenses_count) = cash_out_total(expenses, window);

    CashFlow::new(cash_in, cash_out).with_counts(sales_count, expenses_count)
}

/// Same result as `compute_cash_flow`, reduced per chunk of `chunk_size`
/// records and combined afterwards. A `chunk_size` of zero is treated as one.
pub fn compute_cash_flow_sharded(
    sales: &[Sale],
    expenses: &[Expense],
    window: &Window,
    chunk_size: usize,
) -> CashFlow {
    let n = chunk_size.max(1);
    let inflow: CashFlow = sales
        .chunks(n)
        .map(|chunk| compute_cash_flow(chunk, &[], window))
        .sum();
    let outflow: CashFlow = expenses
        .chunks(n)
        .map(|chunk| compute_cash_flow(&[], chunk, window))
        .sum();
    inflow + outflow
}
