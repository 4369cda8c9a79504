//! Health metric ingestion payloads.
//!
//! Expected shape:
//!
//! ```json
//! { "data": { "metrics": [ { "name": "active_energy", "data": [ { "qty": 512.7 } ] } ] } }
//! ```
//!
//! Parsing is lenient. A body that is not JSON, or lacks the metrics list,
//! yields no metrics; a malformed entry is skipped without affecting its
//! neighbours.

use crate::Metric;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct MetricEntry {
    name: String,
    #[serde(default)]
    data: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    qty: Option<f64>,
}

impl MetricEntry {
    /// Samples arrive oldest first, so the last quantity is the latest
    fn into_metric(self) -> Option<Metric> {
        let latest_quantity = self.data.iter().rev().find_map(|s| s.qty)?;
        Some(Metric {
            name: self.name,
            latest_quantity,
        })
    }
}

/// Extract metric readings from a raw request body
pub fn parse_metrics(body: &[u8]) -> Vec<Metric> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => metrics_from_value(&value),
        Err(e) => {
            tracing::warn!("Ingestion body is not valid JSON: {}", e);
            Vec::new()
        }
    }
}

/// Extract metric readings from an already-parsed payload
pub fn metrics_from_value(payload: &Value) -> Vec<Metric> {
    let Some(entries) = payload
        .get("data")
        .and_then(|d| d.get("metrics"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("Ingestion payload has no metrics list");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match MetricEntry::deserialize(entry) {
            Ok(entry) => entry.into_metric(),
            Err(e) => {
                tracing::debug!("Skipping malformed metric entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_expected_shape() {
        let body = br#"{
            "data": {
                "metrics": [
                    { "name": "Active Energy", "units": "kcal", "data": [ { "qty": 512.7 } ] },
                    { "name": "protein", "data": [ { "qty": 20 }, { "qty": 95.2 } ] }
                ]
            }
        }"#;

        let metrics = parse_metrics(body);

        assert_eq!(
            metrics,
            vec![
                Metric { name: "Active Energy".into(), latest_quantity: 512.7 },
                Metric { name: "protein".into(), latest_quantity: 95.2 },
            ]
        );
    }

    #[test]
    fn test_missing_or_empty_metrics_yield_nothing() {
        assert!(parse_metrics(b"{}").is_empty());
        assert!(parse_metrics(br#"{"data": {}}"#).is_empty());
        assert!(parse_metrics(br#"{"data": {"metrics": []}}"#).is_empty());
        assert!(parse_metrics(br#"{"data": {"metrics": "nope"}}"#).is_empty());
        assert!(parse_metrics(b"not json at all").is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let body = br#"{"data": {"metrics": [
            { "data": [ { "qty": 1 } ] },
            { "name": "energy", "data": [] },
            { "name": "energy", "data": [ { "qty": "lots" } ] },
            { "name": "protein", "data": [ { "qty": 30 }, { "date": "2024-01-01" } ] }
        ]}}"#;

        let metrics = parse_metrics(body);

        assert_eq!(
            metrics,
            vec![Metric { name: "protein".into(), latest_quantity: 30.0 }]
        );
    }
}
