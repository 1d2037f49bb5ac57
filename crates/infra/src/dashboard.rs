//! Runs every aggregation over one snapshot and one window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerlens_accounting::{compute_cash_flow, CashFlow};
use ledgerlens_core::{MetricsResult, Period, Window};
use ledgerlens_inventory::{evaluate_low_stock, LowStockAlert};
use ledgerlens_support::{compute_support_metrics_with, Directory, MetricsSnapshot, SupportConversation};

use crate::config::MetricsConfig;
use crate::snapshot::{SkippedRecords, Snapshot};

/// Everything a dashboard or export renders for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub period: Period,
    pub reference: DateTime<Utc>,
    pub window: Window,
    pub cash_flow: CashFlow,
    pub low_stock_threshold: u64,
    pub low_stock: Vec<LowStockAlert>,
    /// Computed over conversations opened inside `window`.
    pub support: MetricsSnapshot,
    pub skipped: SkippedRecords,
}

/// Stateless report builder; holds configuration only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dashboard {
    config: MetricsConfig,
}

impl Dashboard {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Build the report for `period` around `reference`.
    pub fn build<D: Directory + ?Sized>(
        &self,
        snapshot: &Snapshot,
        period: Period,
        reference: DateTime<Utc>,
        directory: &D,
    ) -> DashboardReport {
        let window = self.config.resolver.resolve(period, reference);

        let cash_flow = compute_cash_flow(&snapshot.sales, &snapshot.expenses, &window);
        let low_stock = evaluate_low_stock(&snapshot.products, self.config.low_stock_threshold);

        let opened: Vec<SupportConversation> =
            window.select(&snapshot.conversations).cloned().collect();
        let support = compute_support_metrics_with(&opened, directory);

        tracing::debug!(
            %period,
            start = %window.start(),
            end = %window.end(),
            cash_in = %cash_flow.cash_in(),
            cash_out = %cash_flow.cash_out(),
            low_stock = low_stock.len(),
            conversations = support.total_conversations,
            "dashboard built"
        );

        DashboardReport {
            period,
            reference,
            window,
            cash_flow,
            low_stock_threshold: self.config.low_stock_threshold,
            low_stock,
            support,
            skipped: snapshot.skipped,
        }
    }

    /// Same as `build`, with the period given as a token (`"today"`, `"this month"`, ...).
    pub fn build_for_token<D: Directory + ?Sized>(
        &self,
        snapshot: &Snapshot,
        token: &str,
        reference: DateTime<Utc>,
        directory: &D,
    ) -> MetricsResult<DashboardReport> {
        let period: Period = token.parse()?;
        Ok(self.build(snapshot, period, reference, directory))
    }

    /// Build with the configured default period.
    pub fn build_default<D: Directory + ?Sized>(
        &self,
        snapshot: &Snapshot,
        reference: DateTime<Utc>,
        directory: &D,
    ) -> DashboardReport {
        self.build(snapshot, self.config.default_period, reference, directory)
    }
}
