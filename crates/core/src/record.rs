//! Record traits: identity + the instant a record is windowed on.

use chrono::{DateTime, Utc};

/// A record supplied by the record source.
pub trait Record {
    /// Strongly-typed record identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Short kind name used in errors and logs (e.g. `"sale"`).
    const KIND: &'static str;

    /// Returns the record identifier.
    fn id(&self) -> &Self::Id;
}

/// A record that belongs to a point in time.
///
/// `occurred_at` is the timestamp window filters are evaluated against: the
/// sale date, the expense creation instant, the conversation opening instant.
pub trait Dated: Record {
    fn occurred_at(&self) -> DateTime<Utc>;
}
