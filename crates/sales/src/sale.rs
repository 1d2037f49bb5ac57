use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerlens_core::{Dated, Record, SaleId, Window};

/// Sale status lifecycle.
///
/// A sale is created `Pending` by the point-of-sale flow and ends either
/// `Completed` (immutable from then on) or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the lowercase wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SaleStatus::Pending),
            "completed" => Some(SaleStatus::Completed),
            "cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }
}

/// A sale as supplied by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub status: SaleStatus,
}

impl Sale {
    pub fn new(id: SaleId, date: DateTime<Utc>, total: Decimal, status: SaleStatus) -> Self {
        Self {
            id,
            date,
            total,
            status,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, SaleStatus::Completed)
    }
}

impl Record for Sale {
    type Id = SaleId;
    const KIND: &'static str = "sale";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Dated for Sale {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.date
    }
}

/// A sale counts as cash in when it is completed and dated inside `window`.
pub fn is_cash_in(sale: &Sale, window: &Window) -> bool {
    sale.is_completed() && window.contains(sale.date)
}

/// Sum of `total` over cash-in sales, plus how many sales contributed.
///
/// The sum saturates at `Decimal::MAX` / `Decimal::MIN`.
pub fn cash_in_total(sales: &[Sale], window: &Window) -> (Decimal, usize) {
    sales
        .iter()
        .filter(|s| is_cash_in(s, window))
        .fold((Decimal::ZERO, 0), |(sum, n), s| (sum.saturating_add(s.total), n + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use ledgerlens_core::{resolve_window, Period};
    use proptest::prelude::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn sale(date: &str, total: i64, status: SaleStatus) -> Sale {
        Sale::new(SaleId::new(), utc(date), Decimal::from(total), status)
    }

    #[test]
    fn only_completed_sales_are_cash_in() {
        let w = resolve_window(Period::Day, utc("2024-03-10T12:00:00Z"));
        assert!(is_cash_in(&sale("2024-03-10T08:00:00Z", 10, SaleStatus::Completed), &w));
        assert!(!is_cash_in(&sale("2024-03-10T08:00:00Z", 10, SaleStatus::Pending), &w));
        assert!(!is_cash_in(&sale("2024-03-10T08:00:00Z", 10, SaleStatus::Cancelled), &w));
    }

    #[test]
    fn sale_on_window_end_is_included_and_one_millisecond_later_is_not() {
        let w = resolve_window(Period::Day, utc("2024-03-10T12:00:00Z"));
        let on_end = Sale::new(SaleId::new(), w.end(), Decimal::ONE, SaleStatus::Completed);
        let after = Sale::new(
            SaleId::new(),
            w.end() + Duration::milliseconds(1),
            Decimal::ONE,
            SaleStatus::Completed,
        );
        assert!(is_cash_in(&on_end, &w));
        assert!(!is_cash_in(&after, &w));
    }

    #[test]
    fn cash_in_total_counts_contributors() {
        let w = resolve_window(Period::Day, utc("2024-03-10T12:00:00Z"));
        let sales = vec![
            sale("2024-03-10T08:00:00Z", 50, SaleStatus::Completed),
            sale("2024-03-10T09:00:00Z", 70, SaleStatus::Cancelled),
            sale("2024-03-10T10:00:00Z", 30, SaleStatus::Completed),
        ];
        assert_eq!(cash_in_total(&sales, &w), (Decimal::from(80), 2));
        assert_eq!(cash_in_total(&[], &w), (Decimal::ZERO, 0));
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&SaleStatus::Completed).unwrap(), "\"completed\"");
        assert_eq!(SaleStatus::parse("cancelled"), Some(SaleStatus::Cancelled));
        assert_eq!(SaleStatus::parse("Completed"), None);
    }

    #[test]
    fn cash_in_total_saturates_at_the_decimal_bound() {
        let w = resolve_window(Period::Day, utc("2024-03-10T12:00:00Z"));
        let at = utc("2024-03-10T08:00:00Z");
        let sales = vec![
            Sale::new(SaleId::new(), at, Decimal::MAX, SaleStatus::Completed),
            Sale::new(SaleId::new(), at, Decimal::MAX, SaleStatus::Completed),
        ];
        assert_eq!(cash_in_total(&sales, &w), (Decimal::MAX, 2));
    }

    proptest! {
        /// Property: the total only counts completed sales inside the window,
        /// and equals the plain sum of those totals.
        #[test]
        fn cash_in_total_matches_filtered_sum(
            entries in prop::collection::vec((-86_400_000i64..(2 * 86_400_000), 0i64..1_000_000, 0u8..3), 0..50),
        ) {
            let w = resolve_window(Period::Day, utc("2024-03-10T12:00:00Z"));
            let start = w.start();
            let sales: Vec<Sale> = entries
                .iter()
                .map(|&(ms, cents, st)| {
                    let status = match st {
                        0 => SaleStatus::Pending,
                        1 => SaleStatus::Completed,
                        _ => SaleStatus::Cancelled,
                    };
                    Sale::new(SaleId::new(), start + Duration::milliseconds(ms), Decimal::new(cents, 2), status)
                })
                .collect();

            let expected: Vec<&Sale> = sales
                .iter()
                .filter(|s| s.is_completed() && s.date >= w.start() && s.date <= w.end())
                .collect();
            let sum: Decimal = expected.iter().map(|s| s.total).sum();

            prop_assert_eq!(cash_in_total(&sales, &w), (sum, expected.len()));
        }
    }
}
