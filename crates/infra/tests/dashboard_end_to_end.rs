use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use ledgerlens_accounting::{Expense, ExpenseStatus};
use ledgerlens_core::{ConversationId, ExpenseId, Period, ProductId, SaleId};
use ledgerlens_infra::source::{typed, Lenient, RawConversation, RawSale};
use ledgerlens_infra::{
    Dashboard, InMemoryRecordSource, JsonFileSource, MetricsConfig, RecordSource, Snapshot,
};
use ledgerlens_inventory::Product;
use ledgerlens_sales::{Sale, SaleStatus};
use ledgerlens_support::{InMemoryDirectory, NoDirectory, SupportConversation};

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn sale(date: &str, total: i64, status: SaleStatus) -> Sale {
    Sale::new(SaleId::new(), utc(date), Decimal::from(total), status)
}

fn seeded_source() -> InMemoryRecordSource {
    let sales = vec![
        sale("2024-03-10T08:00:00Z", 50, SaleStatus::Completed),
        sale("2024-03-10T23:59:59.999Z", 30, SaleStatus::Completed),
        sale("2024-03-11T00:00:00.001Z", 999, SaleStatus::Completed),
        sale("2024-03-10T12:00:00Z", 400, SaleStatus::Cancelled),
    ];
    let expenses = vec![
        Expense::new(ExpenseId::new(), utc("2024-03-10T09:30:00Z"), Decimal::new(2550, 2), ExpenseStatus::Paid),
        Expense::new(ExpenseId::new(), utc("2024-03-10T10:30:00Z"), Decimal::from(100), ExpenseStatus::Pending),
    ];
    let products = vec![
        Product::new(ProductId::new(), "A", 5),
        Product::new(ProductId::new(), "B", 15),
        Product::new(ProductId::new(), "C", 10),
    ];
    let t0 = utc("2024-03-10T09:00:00Z");
    let conversations = vec![
        SupportConversation::opened(ConversationId::new(), t0, "x")
            .with_first_response(t0 + Duration::minutes(2))
            .with_resolution(t0 + Duration::minutes(20))
            .with_tags(["vip"]),
        SupportConversation::opened(ConversationId::new(), t0, "y").with_transfer(),
        SupportConversation::opened(ConversationId::new(), t0, "x")
            .with_first_response(t0 + Duration::minutes(4)),
        // Opened the day before; outside a day window.
        SupportConversation::opened(ConversationId::new(), t0 - Duration::days(1), "z"),
    ];

    InMemoryRecordSource::new()
        .with_sales(&sales)
        .with_expenses(&expenses)
        .with_products(&products)
        .with_conversations(&conversations)
}

#[test]
fn day_dashboard_covers_every_metric() {
    let source = seeded_source();
    let snapshot = Snapshot::load(&source).unwrap();
    let dashboard = Dashboard::new(MetricsConfig::default());

    let report = dashboard.build(&snapshot, Period::Day, utc("2024-03-10T15:00:00Z"), &NoDirectory);

    assert_eq!(report.window.start(), utc("2024-03-10T00:00:00Z"));
    assert_eq!(report.window.end(), utc("2024-03-10T23:59:59.999Z"));

    assert_eq!(report.cash_flow.cash_in(), Decimal::from(80));
    assert_eq!(report.cash_flow.cash_out(), Decimal::new(2550, 2));
    assert_eq!(report.cash_flow.balance(), Decimal::new(5450, 2));

    let low: Vec<(&str, u64)> = report.low_stock.iter().map(|a| (a.name.as_str(), a.quantity)).collect();
    assert_eq!(low, vec![("A", 5), ("C", 10)]);

    assert_eq!(report.support.total_conversations, 3);
    assert_eq!(report.support.open_conversations, 2);
    assert_eq!(report.support.avg_first_response_minutes, 3.0);
    assert_eq!(report.support.avg_resolution_minutes, 20.0);
    assert_eq!(report.support.transfer_rate, 33);
    let teams: Vec<(&str, usize)> = report
        .support
        .chats_by_team
        .iter()
        .map(|t| (t.team_id.as_str(), t.count))
        .collect();
    assert_eq!(teams, vec![("x", 2), ("y", 1)]);
    assert_eq!(report.skipped.total(), 0);
}

#[test]
fn rebuilding_on_the_same_snapshot_is_idempotent() {
    let snapshot = Snapshot::load(&seeded_source()).unwrap();
    let dashboard = Dashboard::default();
    let reference = utc("2024-03-10T15:00:00Z");

    let first = dashboard.build(&snapshot, Period::Month, reference, &NoDirectory);
    let second = dashboard.build(&snapshot, Period::Month, reference, &NoDirectory);
    assert_eq!(first, second);
    assert_eq!(first.cash_flow.cash_in(), Decimal::from(1079));
}

#[test]
fn fresh_snapshot_reflects_inventory_changes() {
    let source = seeded_source();
    let dashboard = Dashboard::default();
    let reference = utc("2024-03-10T15:00:00Z");

    let before = dashboard.build(&Snapshot::load(&source).unwrap(), Period::Day, reference, &NoDirectory);
    assert_eq!(before.low_stock.len(), 2);

    let b_id = source.list_products().unwrap()[1]
        .id
        .clone()
        .and_then(Lenient::into_typed)
        .unwrap();
    assert!(source.set_product_quantity(&b_id, 1).unwrap());

    let after = dashboard.build(&Snapshot::load(&source).unwrap(), Period::Day, reference, &NoDirectory);
    let names: Vec<&str> = after.low_stock.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn configured_threshold_and_offset_are_applied() {
    let config = MetricsConfig::from_lookup(|key| match key {
        "LEDGERLENS_LOW_STOCK_THRESHOLD" => Some("5".to_string()),
        "LEDGERLENS_UTC_OFFSET_MINUTES" => Some("60".to_string()),
        _ => None,
    })
    .unwrap();
    let snapshot = Snapshot::load(&seeded_source()).unwrap();

    let report = Dashboard::new(config).build(&snapshot, Period::Day, utc("2024-03-10T15:00:00Z"), &NoDirectory);

    // At UTC+01:00 the day runs 2024-03-09T23:00Z ..= 2024-03-10T22:59:59.999Z,
    // so the 23:59:59.999Z sale falls on the next local day.
    assert_eq!(report.window.start(), utc("2024-03-09T23:00:00Z"));
    assert_eq!(report.cash_flow.cash_in(), Decimal::from(50));
    assert_eq!(report.low_stock.len(), 1);
    assert_eq!(report.low_stock_threshold, 5);
}

#[test]
fn unknown_period_token_is_rejected() {
    let snapshot = Snapshot::default();
    let err = Dashboard::default()
        .build_for_token(&snapshot, "fortnight", utc("2024-03-10T15:00:00Z"), &NoDirectory)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid period: \"fortnight\"");
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let source = seeded_source();
    source
        .push_sale(RawSale {
            id: typed(SaleId::new().to_string()),
            date: typed("yesterday"),
            total: typed(Decimal::from(5)),
            status: typed("completed"),
        })
        .unwrap();
    source
        .push_conversation(RawConversation {
            id: typed(ConversationId::new().to_string()),
            opened_at: typed("2024-03-10T10:00:00Z"),
            ..RawConversation::default()
        })
        .unwrap();

    let snapshot = Snapshot::load(&source).unwrap();
    let report = Dashboard::default().build(&snapshot, Period::Day, utc("2024-03-10T15:00:00Z"), &NoDirectory);

    assert_eq!(report.cash_flow.cash_in(), Decimal::from(80));
    assert_eq!(report.skipped.sales, 1);
    assert_eq!(report.skipped.conversations, 1);
}

#[test]
fn json_snapshot_file_round_trip_through_the_dashboard() {
    let json = r##"{
        "sales": [
            {"id": "0190f3a4-5b6c-7d8e-9f00-000000000001", "date": "2024-03-10T08:00:00Z", "total": "50.25", "status": "completed"},
            {"id": "0190f3a4-5b6c-7d8e-9f00-000000000002", "date": "2024-03-10T09:00:00Z", "total": 10, "status": "pending"}
        ],
        "expenses": [
            {"id": "0190f3a4-5b6c-7d8e-9f00-000000000003", "createdAt": "2024-03-10T10:00:00Z", "amount": "0.25", "status": "paid"}
        ],
        "products": [
            {"id": "0190f3a4-5b6c-7d8e-9f00-000000000004", "name": "Flour", "quantity": 2}
        ],
        "conversations": [
            {"id": "0190f3a4-5b6c-7d8e-9f00-000000000005", "openedAt": "2024-03-10T09:00:00Z", "teamId": "x", "tags": ["vip"], "transferred": true}
        ],
        "tags": [{"id": "vip", "name": "VIP", "color": "#ffaa00"}],
        "teams": [{"id": "x", "name": "Billing"}]
    }"##;

    let path = std::env::temp_dir().join(format!("ledgerlens-snapshot-{}.json", SaleId::new()));
    std::fs::write(&path, json).unwrap();
    let source = JsonFileSource::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let directory: InMemoryDirectory = source.directory();
    let snapshot = Snapshot::load(&source).unwrap();
    let report = Dashboard::default().build(&snapshot, Period::Day, utc("2024-03-10T15:00:00Z"), &directory);

    assert_eq!(report.cash_flow.cash_in(), Decimal::new(5025, 2));
    assert_eq!(report.cash_flow.balance(), Decimal::from(50));
    assert_eq!(report.support.transfer_rate, 100);
    assert_eq!(report.support.chats_by_team[0].team_name.as_deref(), Some("Billing"));
    assert_eq!(report.support.chats_by_tag[0].color.as_deref(), Some("#ffaa00"));

    let rendered = serde_json::to_value(&report).unwrap();
    assert_eq!(rendered["cash_flow"]["cash_in"], "50.25");
    assert_eq!(rendered["period"], "day");
    assert_eq!(rendered["low_stock"][0]["name"], "Flour");
}
