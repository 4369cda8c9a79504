//! Default workout catalog.
//!
//! This module provides the built-in workout days and their exercises. The
//! catalog is static for the lifetime of the process.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn exercise(name: &str, target_sets: u32, rep_range: &str, weight: &str) -> Exercise {
    Exercise {
        name: name.into(),
        target_sets,
        rep_range: rep_range.into(),
        weight: weight.into(),
    }
}

fn day(key: &str, label: &str, keyword: &str, exercises: Vec<Exercise>) -> WorkoutDay {
    WorkoutDay {
        key: key.into(),
        label: label.into(),
        keyword: keyword.into(),
        exercises,
    }
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    Catalog {
        days: vec![
            day(
                "push",
                "PUSH",
                "push",
                vec![
                    exercise("Incline Bench", 3, "6-10", "125"),
                    exercise("Cable Flys", 3, "8-12", "180"),
                ],
            ),
            day(
                "pull",
                "PULL",
                "pull",
                vec![
                    exercise("Lat Pulldowns", 3, "10-12", "100"),
                    exercise("Seated Rows", 3, "8-12", "200"),
                ],
            ),
            day(
                "legs",
                "LEGS",
                "leg",
                vec![
                    exercise("Leg Extensions", 3, "16", "130"),
                    exercise("Leg Curls", 3, "12", "100"),
                ],
            ),
            day(
                "weakpoint",
                "WEAK",
                "weak",
                vec![exercise("Face Pulls", 3, "8-12", "120")],
            ),
            day(
                "abs",
                "ABS",
                "abs",
                vec![exercise("Cable Crunch", 3, "8-12", "100")],
            ),
        ],
    }
}

impl Catalog {
    /// Look up a day by key
    pub fn day(&self, key: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|d| d.key == key)
    }

    /// Exercise at `index` within day `key`, if both exist
    pub fn exercise(&self, key: &str, index: usize) -> Option<&Exercise> {
        self.day(key).and_then(|d| d.exercises.get(index))
    }

    /// First day (in catalog order) whose keyword appears in `speech`
    ///
    /// `speech` is expected to be lowercase already.
    pub fn match_day(&self, speech: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|d| speech.contains(d.keyword.as_str()))
    }

    /// Validate the catalog, returning a list of problems
    ///
    /// The session state machine relies on every day having at least one
    /// exercise and every exercise having at least one set.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.days.is_empty() {
            errors.push("Catalog has no workout days".to_string());
        }

        for (i, day) in self.days.iter().enumerate() {
            if day.key.is_empty() {
                errors.push(format!("Day #{} has empty key", i));
            }
            if self.days[..i].iter().any(|d| d.key == day.key) {
                errors.push(format!("Duplicate day key '{}'", day.key));
            }
            if day.keyword.is_empty() {
                errors.push(format!("Day '{}' has empty keyword", day.key));
            }
            if day.keyword != day.keyword.to_lowercase() {
                errors.push(format!(
                    "Day '{}' keyword '{}' must be lowercase",
                    day.key, day.keyword
                ));
            }
            if day.exercises.is_empty() {
                errors.push(format!("Day '{}' has no exercises", day.key));
            }

            for ex in &day.exercises {
                if ex.name.is_empty() {
                    errors.push(format!("Day '{}' has an exercise with empty name", day.key));
                }
                if ex.target_sets == 0 {
                    errors.push(format!(
                        "Day '{}': exercise '{}' has zero target sets",
                        day.key, ex.name
                    ));
                }
            }
        }

        errors
    }
}
