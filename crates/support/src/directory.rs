//! Display metadata lookups for tags and teams.
//!
//! Grouping only needs identifiers; names and colors come from whoever owns
//! the tag/team catalogue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ledgerlens_core::{TagId, TeamId};

/// How a tag is shown next to its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDisplay {
    pub name: String,
    pub color: String,
}

/// Tag/team directory collaborator.
pub trait Directory {
    fn tag(&self, id: &TagId) -> Option<TagDisplay>;
    fn team_name(&self, id: &TeamId) -> Option<String>;
}

impl<D: Directory + ?Sized> Directory for &D {
    fn tag(&self, id: &TagId) -> Option<TagDisplay> {
        (**self).tag(id)
    }

    fn team_name(&self, id: &TeamId) -> Option<String> {
        (**self).team_name(id)
    }
}

/// Directory that knows nothing; groups keep bare identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDirectory;

impl Directory for NoDirectory {
    fn tag(&self, _id: &TagId) -> Option<TagDisplay> {
        None
    }

    fn team_name(&self, _id: &TeamId) -> Option<String> {
        None
    }
}

/// In-memory directory for tests/dev and file-backed snapshots.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryDirectory {
    #[serde(default)]
    tags: HashMap<TagId, TagDisplay>,
    #[serde(default)]
    teams: HashMap<TeamId, String>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tag(&mut self, id: impl Into<TagId>, name: impl Into<String>, color: impl Into<String>) {
        self.tags.insert(
            id.into(),
            TagDisplay {
                name: name.into(),
                color: color.into(),
            },
        );
    }

    pub fn insert_team(&mut self, id: impl Into<TeamId>, name: impl Into<String>) {
        self.teams.insert(id.into(), name.into());
    }

    pub fn with_tag(mut self, id: impl Into<TagId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.insert_tag(id, name, color);
        self
    }

    pub fn with_team(mut self, id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        self.insert_team(id, name);
        self
    }
}

impl Directory for InMemoryDirectory {
    fn tag(&self, id: &TagId) -> Option<TagDisplay> {
        self.tags.get(id).cloned()
    }

    fn team_name(&self, id: &TeamId) -> Option<String> {
        self.teams.get(id).cloned()
    }
}
