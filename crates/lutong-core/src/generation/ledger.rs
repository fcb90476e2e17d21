//! Regeneration state and the generation ledger.
//!
//! The ledger replaces in-memory "is generating" flags with a persisted record
//! per generation scope. Every transition is a read-check-write performed in one
//! exclusive store update, so a duplicate request (remount, double click, reload)
//! observes the marker left by the first one.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Regenerations allowed after the initial recipe (three recipes per scope in total).
pub const MAX_REGENERATIONS: u32 = 2;

/// Scope used when generation runs without a session.
pub const GLOBAL_SCOPE: &str = "global";

/// Maps an optional session id to its generation scope.
pub fn scope_for(session_id: Option<&str>) -> String {
    match session_id {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => GLOBAL_SCOPE.to_string(),
    }
}

/// A generation that has started but not finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlight {
    pub attempt: u32,
    /// RFC 3339
    pub started_at: String,
    /// Owner of the marker; only the holder may complete or release it.
    #[serde(default)]
    pub token: String,
}

impl InFlight {
    /// A marker with an unparseable timestamp counts as stale.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        let Ok(started) = DateTime::parse_from_rfc3339(&self.started_at) else {
            return true;
        };
        let age = now.signed_duration_since(started.with_timezone(&Utc));
        age.to_std().map(|age| age >= stale_after).unwrap_or(false)
    }
}

/// Durable regeneration state for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegenerationState {
    pub scope: String,
    /// Attempt number of the latest completed generation
    pub count: u32,
    /// Whether any generation has completed
    pub generated: bool,
    /// Recipe ids in generation order
    #[serde(default)]
    pub recipe_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<InFlight>,
}

/// Result of trying to start a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The caller owns the scope through `token` until it calls `complete` or `release`.
    Granted { token: String },
    /// Another generation for the scope is running.
    AlreadyInProgress { attempt: u32 },
    /// This attempt already completed for the scope.
    AlreadyGenerated {
        count: u32,
        latest_recipe_id: Option<String>,
    },
    /// The attempt skips ahead of the next expected one.
    OutOfOrder { expected: u32 },
}

/// Result of recording a finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Recorded(RegenerationState),
    /// The caller's marker was taken over or cleared; nothing was recorded.
    Superseded(RegenerationState),
}

impl RegenerationState {
    pub fn empty(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Default::default()
        }
    }

    /// The attempt number that would be accepted next.
    pub fn expected_attempt(&self) -> u32 {
        if self.generated { self.count + 1 } else { 0 }
    }

    pub fn remaining(&self) -> u32 {
        if self.generated {
            MAX_REGENERATIONS.saturating_sub(self.count)
        } else {
            MAX_REGENERATIONS
        }
    }

    pub fn latest_recipe_id(&self) -> Option<&str> {
        self.recipe_ids.last().map(String::as_str)
    }

    /// Why `attempt` may not start now, or `None` when it may. Does not mutate.
    pub fn refusal(
        &self,
        attempt: u32,
        now: DateTime<Utc>,
        stale_after: Duration,
    ) -> Option<Acquisition> {
        if let Some(in_flight) = &self.in_progress {
            if !in_flight.is_stale(now, stale_after) {
                return Some(Acquisition::AlreadyInProgress {
                    attempt: in_flight.attempt,
                });
            }
        }

        let expected = self.expected_attempt();
        if attempt < expected {
            Some(Acquisition::AlreadyGenerated {
                count: self.count,
                latest_recipe_id: self.latest_recipe_id().map(str::to_string),
            })
        } else if attempt > expected {
            Some(Acquisition::OutOfOrder { expected })
        } else {
            None
        }
    }

    /// Starts `attempt` under a fresh owner token unless it is refused.
    ///
    /// A stale marker is replaced; its holder can no longer complete.
    pub fn acquire(
        &mut self,
        attempt: u32,
        now: DateTime<Utc>,
        stale_after: Duration,
    ) -> Acquisition {
        if let Some(refused) = self.refusal(attempt, now, stale_after) {
            return refused;
        }

        let token = Uuid::new_v4().to_string();
        self.in_progress = Some(InFlight {
            attempt,
            started_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            token: token.clone(),
        });
        Acquisition::Granted { token }
    }

    pub fn is_held_by(&self, token: &str) -> bool {
        self.in_progress.as_ref().is_some_and(|f| f.token == token)
    }

    /// Records the recipe if `token` still owns the in-flight marker.
    pub fn finish(&mut self, token: &str, attempt: u32, recipe_id: impl Into<String>) -> bool {
        if !self.is_held_by(token) {
            return false;
        }
        self.in_progress = None;
        self.generated = true;
        self.count = attempt;
        self.recipe_ids.push(recipe_id.into());
        true
    }

    /// Drops the in-flight marker if `token` owns it, leaving the completed state untouched.
    pub fn abandon(&mut self, token: &str) -> bool {
        if !self.is_held_by(token) {
            return false;
        }
        self.in_progress = None;
        true
    }
}

/// Durable idempotency keys for recipe generation, one record per scope.
#[async_trait]
pub trait GenerationLedger: Send + Sync {
    /// Atomically evaluates `attempt` and, when granted, marks the scope as generating.
    async fn acquire(&self, scope: &str, attempt: u32, stale_after: Duration) -> Result<Acquisition>;

    /// Records a finished generation when `token` still owns the scope.
    async fn complete(
        &self,
        scope: &str,
        token: &str,
        attempt: u32,
        recipe_id: &str,
    ) -> Result<Completion>;

    /// Clears the in-flight marker after a failed generation, if `token` owns it.
    async fn release(&self, scope: &str, token: &str) -> Result<()>;

    /// Current state; an unknown scope yields an empty state.
    async fn state(&self, scope: &str) -> Result<RegenerationState>;
}
