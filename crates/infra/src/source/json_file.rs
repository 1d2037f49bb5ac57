use std::path::Path;

use serde::{Deserialize, Serialize};

use ledgerlens_support::InMemoryDirectory;

use super::raw::lenient_records;
use super::{RawConversation, RawExpense, RawProduct, RawSale, RecordSource, SourceError};

/// Tag display entry in a snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Team display entry in a snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: String,
    pub name: String,
}

/// One JSON document holding a full snapshot. Missing or `null` arrays mean
/// empty; a malformed record only affects itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotDocument {
    #[serde(deserialize_with = "lenient_records")]
    pub sales: Vec<RawSale>,
    #[serde(deserialize_with = "lenient_records")]
    pub expenses: Vec<RawExpense>,
    #[serde(deserialize_with = "lenient_records")]
    pub products: Vec<RawProduct>,
    #[serde(deserialize_with = "lenient_records")]
    pub conversations: Vec<RawConversation>,
    pub tags: Vec<TagEntry>,
    pub teams: Vec<TeamEntry>,
}

impl SnapshotDocument {
    /// Directory built from the document's `tags` and `teams`.
    pub fn directory(&self) -> InMemoryDirectory {
        let mut directory = InMemoryDirectory::new();
        for tag in &self.tags {
            directory.insert_tag(tag.id.as_str(), tag.name.clone(), tag.color.clone());
        }
        for team in &self.teams {
            directory.insert_team(team.id.as_str(), team.name.clone());
        }
        directory
    }
}

/// Record source backed by a JSON snapshot document, parsed once on open.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    document: SnapshotDocument,
}

impl JsonFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            sales = source.document.sales.len(),
            expenses = source.document.expenses.len(),
            products = source.document.products.len(),
            conversations = source.document.conversations.len(),
            "loaded snapshot document"
        );
        Ok(source)
    }

    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let document: SnapshotDocument =
            serde_json::from_str(text).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &SnapshotDocument {
        &self.document
    }

    pub fn directory(&self) -> InMemoryDirectory {
        self.document.directory()
    }
}

impl RecordSource for JsonFileSource {
    fn list_sales(&self) -> Result<Vec<RawSale>, SourceError> {
        Ok(self.document.sales.clone())
    }

    fn list_expenses(&self) -> Result<Vec<RawExpense>, SourceError> {
        Ok(self.document.expenses.clone())
    }

    fn list_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        Ok(self.document.products.clone())
    }

    fn list_support_conversations(&self) -> Result<Vec<RawConversation>, SourceError> {
        Ok(self.document.conversations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::TagId;
    use ledgerlens_support::Directory;

    #[test]
    fn missing_arrays_default_to_empty() {
        let source = JsonFileSource::from_json(r#"{"products":[{"name":"Flour","quantity":3}]}"#).unwrap();
        assert!(source.list_sales().unwrap().is_empty());
        assert_eq!(source.list_products().unwrap().len(), 1);
    }

    #[test]
    fn badly_typed_records_do_not_fail_the_document() {
        let source = JsonFileSource::from_json(
            r#"{
                "sales": [{"total": "n/a"}, 7, {"total": "5"}],
                "products": null,
                "conversations": [{"tags": null}, {"tags": [1, 2]}]
            }"#,
        )
        .unwrap();
        let sales = source.list_sales().unwrap();
        assert_eq!(sales.len(), 3);
        assert_eq!(sales[1], RawSale::default());
        assert!(source.list_products().unwrap().is_empty());
        assert_eq!(source.list_support_conversations().unwrap().len(), 2);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = JsonFileSource::from_json("{not json").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = JsonFileSource::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn directory_comes_from_tags_and_teams() {
        let source = JsonFileSource::from_json(
            r##"{"tags":[{"id":"vip","name":"VIP","color":"#f00"}],"teams":[{"id":"x","name":"Billing"}]}"##,
        )
        .unwrap();
        let directory = source.directory();
        assert_eq!(directory.tag(&TagId::from("vip")).unwrap().color, "#f00");
        assert_eq!(directory.team_name(&"x".into()).as_deref(), Some("Billing"));
    }
}
