//! Dashboard aggregation: per-badge counts and the current learning-path tier.

use crate::learning_path::tier_for;
use crate::story_log::Interaction;
use serde::Serialize;
use std::collections::BTreeMap;

/// Data behind `GET /dashboard`. Recomputed from a fresh log snapshot on every
/// request; never cached.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// All interactions, oldest first.
    pub stories: Vec<Interaction>,
    /// Occurrences per badge name. BTreeMap keeps rendering order stable.
    pub badge_counts: BTreeMap<String, usize>,
    /// Tier for the count of interactions logged so far (no "+1" here —
    /// contrast with story generation).
    pub learning_path_badge: String,
}

impl DashboardView {
    /// Aggregate a snapshot in one pass.
    pub fn from_stories(stories: Vec<Interaction>) -> Self {
        let mut badge_counts: BTreeMap<String, usize> = BTreeMap::new();
        for story in &stories {
            *badge_counts.entry(story.badge.clone()).or_insert(0) += 1;
        }
        let learning_path_badge = tier_for(stories.len()).to_string();
        Self {
            stories,
            badge_counts,
            learning_path_badge,
        }
    }
}
