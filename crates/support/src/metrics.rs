//! Support KPIs over a set of conversations.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerlens_core::{TagId, TeamId};

use crate::conversation::SupportConversation;
use crate::directory::{Directory, NoDirectory};

/// Conversations handled by one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCount {
    pub team_id: TeamId,
    pub team_name: Option<String>,
    pub count: usize,
}

/// Conversations carrying one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag_id: TagId,
    pub name: Option<String>,
    pub color: Option<String>,
    pub count: usize,
}

/// Support metrics derived from one snapshot of conversations.
///
/// No identity, no persistence: recomputed whenever the snapshot changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_conversations: usize,
    /// Conversations without a resolution instant.
    pub open_conversations: usize,
    /// Mean minutes from opening to first response; 0 when nothing was answered.
    pub avg_first_response_minutes: f64,
    /// Mean minutes from opening to resolution; 0 when nothing was resolved.
    pub avg_resolution_minutes: f64,
    /// Whole percent of conversations transferred at least once.
    pub transfer_rate: u32,
    /// First-seen team order.
    pub chats_by_team: Vec<TeamCount>,
    /// First-seen tag order.
    pub chats_by_tag: Vec<TagCount>,
}

impl MetricsSnapshot {
    /// Fill team names and tag display metadata from `directory`.
    ///
    /// Unknown identifiers keep `None`.
    pub fn resolve_display<D: Directory + ?Sized>(mut self, directory: &D) -> Self {
        for team in &mut self.chats_by_team {
            team.team_name = directory.team_name(&team.team_id);
        }
        for tag in &mut self.chats_by_tag {
            let display = directory.tag(&tag.tag_id);
            tag.name = display.as_ref().map(|d| d.name.clone());
            tag.color = display.map(|d| d.color);
        }
        self
    }
}

/// Compute support metrics with bare identifiers in the group-bys.
pub fn compute_support_metrics(conversations: &[SupportConversation]) -> MetricsSnapshot {
    compute_support_metrics_with(conversations, &NoDirectory)
}

/// Compute support metrics and resolve group display metadata through `directory`.
pub fn compute_support_metrics_with<D: Directory + ?Sized>(
    conversations: &[SupportConversation],
    directory: &D,
) -> MetricsSnapshot {
    let total = conversations.len();
    let open = conversations.iter().filter(|c| c.is_open()).count();
    let transferred = conversations.iter().filter(|c| c.transferred).count();

    let first_response = mean_minutes(
        conversations
            .iter()
            .filter_map(|c| c.first_response_at.map(|at| (c.opened_at, at))),
    );
    let resolution = mean_minutes(
        conversations
            .iter()
            .filter_map(|c| c.resolved_at.map(|at| (c.opened_at, at))),
    );

    let chats_by_team = group_first_seen(conversations.iter().map(|c| c.team_id.clone()))
        .into_iter()
        .map(|(team_id, count)| TeamCount {
            team_id,
            team_name: None,
            count,
        })
        .collect();

    let chats_by_tag = group_first_seen(conversations.iter().flat_map(distinct_tags))
        .into_iter()
        .map(|(tag_id, count)| TagCount {
            tag_id,
            name: None,
            color: None,
            count,
        })
        .collect();

    MetricsSnapshot {
        total_conversations: total,
        open_conversations: open,
        avg_first_response_minutes: first_response,
        avg_resolution_minutes: resolution,
        transfer_rate: percent_rounded(transferred, total),
        chats_by_team,
        chats_by_tag,
    }
    .resolve_display(directory)
}

/// `100 * part / whole` rounded half-up to a whole percent; 0 when `whole` is 0.
fn percent_rounded(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u128, whole as u128);
    let pct = (200 * part + whole) / (2 * whole);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Mean of `(later - earlier)` in minutes; 0 for an empty input.
fn mean_minutes(pairs: impl Iterator<Item = (DateTime<Utc>, DateTime<Utc>)>) -> f64 {
    let (sum_ms, n) = pairs.fold((0i128, 0u64), |(sum, n), (start, end)| {
        (sum + i128::from((end - start).num_milliseconds()), n + 1)
    });
    if n == 0 {
        return 0.0;
    }
    sum_ms as f64 / n as f64 / 60_000.0
}

fn distinct_tags(conversation: &SupportConversation) -> Vec<TagId> {
    let mut seen: Vec<TagId> = Vec::with_capacity(conversation.tags.len());
    for tag in &conversation.tags {
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

/// Count keys, keeping the order in which each key was first seen.
fn group_first_seen<K: Clone + Eq + Hash>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }

    groups
}
