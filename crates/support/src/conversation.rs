use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerlens_core::{ConversationId, Dated, MetricsError, MetricsResult, Record, TagId, TeamId};

/// Support conversation lifecycle: open → (optionally) transferred → resolved.
///
/// `first_response_at` and `resolved_at` are set at most once and never
/// precede `opened_at` (see `validate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportConversation {
    pub id: ConversationId,
    pub opened_at: DateTime<Utc>,
    pub first_response_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Handed over to another team at least once.
    pub transferred: bool,
    /// Distinct tags, in the order they were attached.
    pub tags: Vec<TagId>,
    pub team_id: TeamId,
}

impl SupportConversation {
    /// A freshly opened conversation: no response, unresolved, untagged.
    pub fn opened(id: ConversationId, opened_at: DateTime<Utc>, team_id: impl Into<TeamId>) -> Self {
        Self {
            id,
            opened_at,
            first_response_at: None,
            resolved_at: None,
            transferred: false,
            tags: Vec::new(),
            team_id: team_id.into(),
        }
    }

    pub fn with_first_response(mut self, at: DateTime<Utc>) -> Self {
        self.first_response_at = Some(at);
        self
    }

    pub fn with_resolution(mut self, at: DateTime<Utc>) -> Self {
        self.resolved_at = Some(at);
        self
    }

    pub fn with_transfer(mut self) -> Self {
        self.transferred = true;
        self
    }

    /// Attach tags; duplicates are dropped, first occurrence wins.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagId>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }

    /// Check lifecycle ordering against `opened_at`.
    pub fn validate(&self) -> MetricsResult<()> {
        if let Some(at) = self.first_response_at {
            if at < self.opened_at {
                return Err(MetricsError::invalid_record(
                    Self::KIND,
                    format!("first response {at} precedes opening {}", self.opened_at),
                ));
            }
        }
        if let Some(at) = self.resolved_at {
            if at < self.opened_at {
                return Err(MetricsError::invalid_record(
                    Self::KIND,
                    format!("resolution {at} precedes opening {}", self.opened_at),
                ));
            }
        }
        if self.team_id.as_str().is_empty() {
            return Err(MetricsError::invalid_record(Self::KIND, "team id cannot be empty"));
        }
        Ok(())
    }
}

impl Record for SupportConversation {
    type Id = ConversationId;
    const KIND: &'static str = "conversation";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Dated for SupportConversation {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}
