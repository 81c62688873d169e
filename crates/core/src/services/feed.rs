//! Feed composer.
//!
//! Client-facing reshaping of approved trait collections: total
//! orderings, search filtering and aggregate statistics. Everything in
//! here is pure; the trait service owns the queries.

use crate::services::traits::TraitWithAuthor;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Feed orderings selectable by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Descending creation time.
    #[default]
    Recent,
    /// Descending endorsement count.
    Popular,
    /// Endorsement count plus a flat bonus for traits updated within
    /// the last 24 hours. A step bonus, not a decay curve; ties keep
    /// their input order.
    Trending,
}

/// Aggregate statistics over a (possibly search-filtered) feed subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub total: usize,
    pub endorsements: i64,
    pub contributors: usize,
    pub unique_words: usize,
}

/// Popularity score with a mild recency bonus: the bonus decays
/// linearly to zero after 7 days and never goes negative.
#[must_use]
pub fn trait_score(endorsement_count: i32, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days_since_created = (now - created_at).num_days().max(0);
    let recency_bonus = (7 - days_since_created).max(0) as f64 * 0.1;
    f64::from(endorsement_count) + recency_bonus
}

/// Feed composer.
pub struct FeedComposer;

impl FeedComposer {
    /// The flat bonus applied inside the 24-hour trending window.
    const TRENDING_BONUS: i64 = 10;

    /// Apply a total ordering to a feed. Sorting is stable, so ties are
    /// left in input order.
    #[must_use]
    pub fn sort(
        mut entries: Vec<TraitWithAuthor>,
        sort: FeedSort,
        now: DateTime<Utc>,
    ) -> Vec<TraitWithAuthor> {
        match sort {
            FeedSort::Recent => {
                entries.sort_by(|a, b| b.inner.created_at.cmp(&a.inner.created_at));
            }
            FeedSort::Popular => {
                entries.sort_by(|a, b| {
                    b.inner.endorsement_count.cmp(&a.inner.endorsement_count)
                });
            }
            FeedSort::Trending => {
                entries.sort_by(|a, b| {
                    Self::trending_score(b, now).cmp(&Self::trending_score(a, now))
                });
            }
        }
        entries
    }

    /// Case-insensitive substring search across trait word, display name
    /// and username.
    #[must_use]
    pub fn search(entries: Vec<TraitWithAuthor>, query: &str) -> Vec<TraitWithAuthor> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return entries;
        }

        entries
            .into_iter()
            .filter(|entry| {
                entry.inner.word.to_lowercase().contains(&query)
                    || entry
                        .display_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&query))
                    || entry
                        .username
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Compute aggregate statistics for a feed subset.
    #[must_use]
    pub fn stats(entries: &[TraitWithAuthor]) -> FeedStats {
        let owners: HashSet<&str> = entries.iter().map(|e| e.inner.user_id.as_str()).collect();
        let words: HashSet<String> = entries
            .iter()
            .map(|e| e.inner.word.to_lowercase())
            .collect();

        FeedStats {
            total: entries.len(),
            endorsements: entries
                .iter()
                .map(|e| i64::from(e.inner.endorsement_count))
                .sum(),
            contributors: owners.len(),
            unique_words: words.len(),
        }
    }

    fn trending_score(entry: &TraitWithAuthor, now: DateTime<Utc>) -> i64 {
        let updated_at = entry
            .inner
            .updated_at
            .unwrap_or(entry.inner.created_at)
            .to_utc();
        let bonus = if now - updated_at < Duration::hours(24) {
            Self::TRENDING_BONUS
        } else {
            0
        };
        i64::from(entry.inner.endorsement_count) + bonus
    }
}
