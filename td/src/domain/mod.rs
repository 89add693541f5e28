//! Domain types for TripDaemon
//!
//! TripState is the unit of pipeline state: one record shared by all four
//! stages and snapshotted into the checkpoint store after each run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Re-export store types for convenience
pub use tripstore::{Checkpoint, CheckpointStore, StoreError};

/// Role of a conversation history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Pipeline state for one trip-planning run.
///
/// `history` is append-only and carried forward across runs of the same
/// thread; every other field is reinitialized from the incoming request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripState {
    pub destination: String,
    pub budget: f64,
    pub dates: String,
    pub preferences: String,

    /// Raw search payload, a degraded-search diagnostic, or the skipped marker
    pub search_result: String,

    /// Generated itinerary text, or the low-budget advisory
    pub plan: String,

    /// Budget split over the four fixed categories
    pub cost_breakdown: BTreeMap<String, f64>,

    /// Set by the budget check when the budget is below the threshold
    pub skip_itinerary: bool,

    /// Conversation turns, growing monotonically across runs of a thread
    pub history: Vec<HistoryEntry>,
}

impl TripState {
    /// Fresh state for a run, carrying forward prior history
    pub fn from_request(
        destination: impl Into<String>,
        budget: f64,
        dates: impl Into<String>,
        preferences: impl Into<String>,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            destination: destination.into(),
            budget,
            dates: dates.into(),
            preferences: preferences.into(),
            search_result: String::new(),
            plan: String::new(),
            cost_breakdown: BTreeMap::new(),
            skip_itinerary: false,
            history,
        }
    }
}

/// Format a budget amount the way it appears in prompts and advisories:
/// whole amounts without a trailing ".0"
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}
