//! Live trait view.
//!
//! A reconciling consumer for real-time trait events: server events are
//! applied as deltas against a versioned local snapshot, and an
//! authoritative re-fetch replaces the snapshot (on subscribe and after
//! reconnects) to bound drift from missed events.

use crate::services::event_publisher::StreamEvent;
use love8_common::AppResult;
use love8_db::{entities::traits, repositories::TraitRepository};

/// A versioned local snapshot of one user's traits.
#[derive(Debug, Clone, Default)]
pub struct LiveTraitView {
    user_id: String,
    traits: Vec<traits::Model>,
    version: u64,
}

impl LiveTraitView {
    /// Create an empty view for a user.
    #[must_use]
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            traits: Vec::new(),
            version: 0,
        }
    }

    /// The snapshot version. Bumped on every applied delta and every
    /// reconcile, so consumers can detect change cheaply.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The current snapshot.
    #[must_use]
    pub fn traits(&self) -> &[traits::Model] {
        &self.traits
    }

    /// Apply a server event as a delta.
    ///
    /// Events for other users are ignored. An update for an unknown
    /// trait is inserted rather than dropped: after missed events the
    /// row is still better than nothing until the next reconcile.
    /// Returns whether the snapshot changed.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        let payload = match event {
            StreamEvent::TraitCreated { user_id, payload }
            | StreamEvent::TraitUpdated { user_id, payload } => {
                if *user_id != self.user_id {
                    return false;
                }
                payload
            }
            _ => return false,
        };

        match self.traits.iter_mut().find(|t| t.id == payload.id) {
            Some(existing) => *existing = payload.clone(),
            None => self.traits.push(payload.clone()),
        }

        self.version += 1;
        true
    }

    /// Replace the snapshot with an authoritative fetch.
    pub async fn reconcile(&mut self, repo: &TraitRepository) -> AppResult<()> {
        let fetched = repo.find_approved_by_user(&self.user_id).await?;
        self.traits = fetched;
        self.version += 1;
        Ok(())
    }
}
