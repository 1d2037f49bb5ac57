//! Expenses and cash flow aggregation.
//!
//! Pure logic only: no IO, no persistence concerns.

pub mod cash_flow;
pub mod expense;

pub use cash_flow::{compute_cash_flow, compute_cash_flow_sharded, CashFlow};
pub use expense::{cash_out_total, is_cash_out, Expense, ExpenseStatus};
