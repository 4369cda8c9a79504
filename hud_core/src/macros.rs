//! Macro store: the last known nutrition snapshot and its cache file.

use crate::{MacroSnapshot, Metric};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Result of applying one batch of metric readings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsApplied {
    pub snapshot: MacroSnapshot,
    /// Readings that set a macro; unrecognised names are not counted
    pub applied: usize,
}

/// Holds the current snapshot and the cache file it is saved to
pub struct MacroStore {
    path: PathBuf,
    snapshot: MacroSnapshot,
}

impl MacroStore {
    /// Load the store from `path`, starting from zero if nothing is cached
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = MacroSnapshot::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load macro cache {:?}: {}. Using defaults.", path, e);
            MacroSnapshot::default()
        });
        Self { path, snapshot }
    }

    pub fn snapshot(&self) -> &MacroSnapshot {
        &self.snapshot
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply metric readings and persist the result
    ///
    /// A failed save is logged; the in-memory snapshot is updated regardless.
    pub fn apply_metrics(&mut self, metrics: &[Metric]) -> MetricsApplied {
        let outcome = self.update(metrics);
        persist(&outcome.snapshot, &self.path);
        outcome
    }

    /// Apply metric readings to the in-memory snapshot only
    ///
    /// Names are matched case-insensitively: anything mentioning "energy" or
    /// "calorie" sets calories, anything mentioning "protein" sets protein.
    /// Other metrics are ignored. The caller owns persisting the result.
    pub fn update(&mut self, metrics: &[Metric]) -> MetricsApplied {
        let mut applied = 0;

        for metric in metrics {
            let name = metric.name.to_lowercase();
            let value = round_quantity(metric.latest_quantity);
            let mut matched = false;

            if name.contains("energy") || name.contains("calorie") {
                self.snapshot.calories = value;
                matched = true;
            }
            if name.contains("protein") {
                self.snapshot.protein = value;
                matched = true;
            }

            if matched {
                applied += 1;
            } else {
                tracing::debug!(metric = %metric.name, "Ignoring unrecognised metric");
            }
        }

        self.snapshot.updated_at = Some(Utc::now());
        tracing::info!(
            received = metrics.len(),
            applied,
            calories = self.snapshot.calories,
            protein = self.snapshot.protein,
            "Applied metrics"
        );

        MetricsApplied {
            snapshot: self.snapshot.clone(),
            applied,
        }
    }
}

/// Best-effort save of a snapshot to the macro cache
///
/// Blocks on file I/O; async callers run it on a blocking thread.
pub fn persist(snapshot: &MacroSnapshot, path: &Path) {
    if let Err(e) = snapshot.save(path) {
        tracing::warn!("Failed to persist macro cache {:?}: {}", path, e);
    }
}

/// Round to the nearest whole unit, clamping negatives and NaN to zero
fn round_quantity(quantity: f64) -> u32 {
    if quantity.is_nan() || quantity <= 0.0 {
        0
    } else {
        quantity.round().min(u32::MAX as f64) as u32
    }
}
