//! User model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User profile stored in Firestore.
///
/// The PIN is stored as entered by the mobile client. That is a known risk
/// carried over from the product's login scheme; hardening it is tracked
/// outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID (also used as document ID)
    pub id: u64,
    /// Unique handle
    pub username: String,
    /// Display name
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Login phone number
    pub phone: String,
    /// 4-digit login PIN
    pub pin: String,
    /// Whether the profile is visible to other users
    pub is_public: bool,
    /// Cumulative award score; drives the level tier
    #[serde(default)]
    pub score: u32,
    /// Personal activity streak in days
    #[serde(default)]
    pub current_streak: u32,
    /// Date of the most recent personal activity
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
    /// Unlocked one-time achievements
    #[serde(default)]
    pub achievements: AchievementLedger,
    #[serde(default)]
    pub followed_routine_ids: Vec<u64>,
    #[serde(default)]
    pub active_routine_ids: Vec<u64>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}

/// Explicit ledger of unlocked one-time achievements, keyed by achievement
/// ID (e.g. `"streak_4_days"`).
///
/// The engine takes the ledger as input and returns an updated copy, so
/// award gating never depends on ambient user state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementLedger {
    #[serde(default)]
    unlocked: BTreeSet<String>,
}

impl AchievementLedger {
    pub fn is_unlocked(&self, key: &str) -> bool {
        self.unlocked.contains(key)
    }

    /// Unlock an achievement. Returns `true` if it was newly unlocked.
    pub fn unlock(&mut self, key: &str) -> bool {
        self.unlocked.insert(key.to_string())
    }

    pub fn unlocked_keys(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }
}
