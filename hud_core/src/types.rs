//! Core domain types for the HUD.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and workout days (the static catalog)
//! - The navigation state of the active session
//! - Nutrition snapshots and the metrics that update them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Types
// ============================================================================

/// A single exercise within a workout day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub target_sets: u32,
    /// Free-form rep target, e.g. "6-10" or "16"
    pub rep_range: String,
    /// Working weight as displayed, e.g. "125"
    pub weight: String,
}

/// A named workout routine and the spoken keyword that selects it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDay {
    pub key: String,
    /// Short label for the day menu
    pub label: String,
    /// Lowercase substring that selects this day from speech
    pub keyword: String,
    pub exercises: Vec<Exercise>,
}

/// The complete, ordered workout catalog
///
/// Order is significant: it is both the menu order and the priority used
/// when an utterance contains more than one day keyword.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub days: Vec<WorkoutDay>,
}

// ============================================================================
// Session Types
// ============================================================================

/// Which screen the HUD is showing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Off,
    Macro,
    Gym,
}

/// Where the user currently is in the app and in their workout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub view: View,
    pub selected_day: Option<String>,
    pub exercise_index: usize,
    pub current_set: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            view: View::Macro,
            selected_day: None,
            exercise_index: 0,
            current_set: 1,
        }
    }
}

// ============================================================================
// Nutrition Types
// ============================================================================

/// Last known nutrition totals
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MacroSnapshot {
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: u32,
    #[serde(default)]
    pub carbs: u32,
    #[serde(default)]
    pub fat: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One health metric reading extracted from an ingestion payload
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub name: String,
    pub latest_quantity: f64,
}
