//! Wire-shaped records as handed over by a record source.
//!
//! Every field is optional and may hold a value of the wrong JSON type; such a
//! record still parses, and conversion into the typed records rejects it with
//! `MetricsError::InvalidRecord`. Statuses are free strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use ledgerlens_accounting::{Expense, ExpenseStatus};
use ledgerlens_core::{
    ConversationId, ExpenseId, MetricsError, MetricsResult, ProductId, Record, SaleId, TagId,
    TeamId,
};
use ledgerlens_inventory::Product;
use ledgerlens_sales::{Sale, SaleStatus};
use ledgerlens_support::SupportConversation;

/// A wire field: either the expected type or whatever JSON was found instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Typed(T),
    Malformed(serde_json::Value),
}

impl<T> Lenient<T> {
    pub fn as_typed(&self) -> Option<&T> {
        match self {
            Lenient::Typed(value) => Some(value),
            Lenient::Malformed(_) => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            Lenient::Typed(value) => Some(value),
            Lenient::Malformed(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Typed(value)
    }
}

/// `Some(Lenient::Typed(value))`.
pub fn typed<T>(value: impl Into<T>) -> Option<Lenient<T>> {
    Some(Lenient::Typed(value.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSale {
    pub id: Option<Lenient<String>>,
    pub date: Option<Lenient<String>>,
    pub total: Option<Lenient<Decimal>>,
    pub status: Option<Lenient<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExpense {
    pub id: Option<Lenient<String>>,
    pub created_at: Option<Lenient<String>>,
    pub amount: Option<Lenient<Decimal>>,
    pub status: Option<Lenient<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    pub id: Option<Lenient<String>>,
    pub name: Option<Lenient<String>>,
    pub quantity: Option<Lenient<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConversation {
    pub id: Option<Lenient<String>>,
    pub opened_at: Option<Lenient<String>>,
    pub first_response_at: Option<Lenient<String>>,
    pub resolved_at: Option<Lenient<String>>,
    pub transferred: Option<Lenient<bool>>,
    /// `null` or absent means no tags.
    pub tags: Option<Lenient<Vec<String>>>,
    pub team_id: Option<Lenient<String>>,
}

/// Deserialize a record array element by element.
///
/// `null` reads as empty; an element that is not a record object becomes an
/// empty record, which conversion then rejects on its own.
pub(crate) fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .collect())
}

fn field<T>(value: Option<Lenient<T>>, kind: &'static str, name: &str) -> MetricsResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(Lenient::Typed(value)) => Ok(Some(value)),
        Some(Lenient::Malformed(found)) => Err(MetricsError::invalid_record(
            kind,
            format!("{name}: unexpected value {found}"),
        )),
    }
}

fn required<T>(value: Option<Lenient<T>>, kind: &'static str, name: &str) -> MetricsResult<T> {
    field(value, kind, name)?
        .ok_or_else(|| MetricsError::invalid_record(kind, format!("missing {name}")))
}

fn parse_id<I>(value: Option<Lenient<String>>, kind: &'static str) -> MetricsResult<I>
where
    I: core::str::FromStr<Err = MetricsError>,
{
    let raw = required(value, kind, "id")?;
    raw.parse::<I>()
        .map_err(|e| MetricsError::invalid_record(kind, e.to_string()))
}

fn parse_instant(value: &str, kind: &'static str, name: &str) -> MetricsResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MetricsError::invalid_record(kind, format!("{name}: {e}")))
}

fn required_instant(
    value: Option<Lenient<String>>,
    kind: &'static str,
    name: &str,
) -> MetricsResult<DateTime<Utc>> {
    parse_instant(&required(value, kind, name)?, kind, name)
}

fn optional_instant(
    value: Option<Lenient<String>>,
    kind: &'static str,
    name: &str,
) -> MetricsResult<Option<DateTime<Utc>>> {
    field(value, kind, name)?
        .map(|v| parse_instant(&v, kind, name))
        .transpose()
}

fn instant_string(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl TryFrom<RawSale> for Sale {
    type Error = MetricsError;

    fn try_from(raw: RawSale) -> Result<Self, Self::Error> {
        let kind = Sale::KIND;
        let id: SaleId = parse_id(raw.id, kind)?;
        let date = required_instant(raw.date, kind, "date")?;
        let total = required(raw.total, kind, "total")?;
        let status = required(raw.status, kind, "status")?;
        let status = SaleStatus::parse(&status)
            .ok_or_else(|| MetricsError::invalid_record(kind, format!("unknown status {status:?}")))?;
        Ok(Sale::new(id, date, total, status))
    }
}

impl From<&Sale> for RawSale {
    fn from(sale: &Sale) -> Self {
        Self {
            id: typed(sale.id.to_string()),
            date: typed(instant_string(sale.date)),
            total: typed(sale.total),
            status: typed(sale.status.as_str()),
        }
    }
}

impl TryFrom<RawExpense> for Expense {
    type Error = MetricsError;

    fn try_from(raw: RawExpense) -> Result<Self, Self::Error> {
        let kind = Expense::KIND;
        let id: ExpenseId = parse_id(raw.id, kind)?;
        let created_at = required_instant(raw.created_at, kind, "createdAt")?;
        let amount = required(raw.amount, kind, "amount")?;
        let status = required(raw.status, kind, "status")?;
        let status = ExpenseStatus::parse(&status)
            .ok_or_else(|| MetricsError::invalid_record(kind, format!("unknown status {status:?}")))?;
        Ok(Expense::new(id, created_at, amount, status))
    }
}

impl From<&Expense> for RawExpense {
    fn from(expense: &Expense) -> Self {
        Self {
            id: typed(expense.id.to_string()),
            created_at: typed(instant_string(expense.created_at)),
            amount: typed(expense.amount),
            status: typed(expense.status.as_str()),
        }
    }
}

impl TryFrom<RawProduct> for Product {
    type Error = MetricsError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let kind = Product::KIND;
        let id: ProductId = parse_id(raw.id, kind)?;
        let name = required(raw.name, kind, "name")?;
        let quantity = required(raw.quantity, kind, "quantity")?;
        Product::try_new(id, name, quantity)
    }
}

impl From<&Product> for RawProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: typed(product.id.to_string()),
            name: typed(product.name.as_str()),
            quantity: i64::try_from(product.quantity).ok().map(Lenient::Typed),
        }
    }
}

impl TryFrom<RawConversation> for SupportConversation {
    type Error = MetricsError;

    fn try_from(raw: RawConversation) -> Result<Self, Self::Error> {
        let kind = SupportConversation::KIND;
        let id: ConversationId = parse_id(raw.id, kind)?;
        let opened_at = required_instant(raw.opened_at, kind, "openedAt")?;
        let first_response_at = optional_instant(raw.first_response_at, kind, "firstResponseAt")?;
        let resolved_at = optional_instant(raw.resolved_at, kind, "resolvedAt")?;
        let transferred = field(raw.transferred, kind, "transferred")?.unwrap_or(false);
        let tags = field(raw.tags, kind, "tags")?.unwrap_or_default();
        let team_id = TeamId::new(required(raw.team_id, kind, "teamId")?);

        let conversation = SupportConversation {
            id,
            opened_at,
            first_response_at,
            resolved_at,
            transferred,
            tags: Vec::new(),
            team_id,
        }
        .with_tags(tags.into_iter().map(TagId::from));

        conversation.validate()?;
        Ok(conversation)
    }
}

impl From<&SupportConversation> for RawConversation {
    fn from(c: &SupportConversation) -> Self {
        Self {
            id: typed(c.id.to_string()),
            opened_at: typed(instant_string(c.opened_at)),
            first_response_at: c.first_response_at.map(|at| instant_string(at).into()),
            resolved_at: c.resolved_at.map(|at| instant_string(at).into()),
            transferred: typed(c.transferred),
            tags: typed(c.tags.iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>()),
            team_id: typed(c.team_id.as_str()),
        }
    }
}
